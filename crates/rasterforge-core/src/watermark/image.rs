//! Secondary-image watermark.

use image::imageops;

use super::anchor::place_box;
use crate::decode::{resize, FilterType, Raster};
use crate::options::WatermarkImageSpec;

/// Watermark output size: `scale` of the canvas width, aspect preserved.
pub fn watermark_size(canvas_width: u32, watermark: (u32, u32), scale: f32) -> (u32, u32) {
    let (ww, wh) = (watermark.0.max(1) as f64, watermark.1.max(1) as f64);
    let w = (canvas_width as f64 * scale as f64).round().max(1.0);
    let h = (w * wh / ww).round().max(1.0);
    (w as u32, h as u32)
}

/// Overlay `watermark` onto `canvas` at the anchored position.
///
/// No-op for a zero opacity or an empty watermark.
pub fn apply_image_watermark(canvas: &mut Raster, watermark: &Raster, spec: &WatermarkImageSpec) {
    let opacity = spec.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || watermark.is_empty() || canvas.is_empty() {
        return;
    }

    let (w, h) = watermark_size(canvas.width, (watermark.width, watermark.height), spec.scale);
    let scaled = if (w, h) == (watermark.width, watermark.height) {
        watermark.clone()
    } else {
        match resize(watermark, w, h, FilterType::Lanczos3) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to scale watermark image");
                return;
            }
        }
    };
    let Some(mut layer) = scaled.into_rgba_image() else {
        return;
    };

    if opacity < 1.0 {
        for pixel in layer.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
        }
    }

    let (x, y) = place_box(
        (canvas.width, canvas.height),
        (w, h),
        spec.position,
        spec.padding,
    );
    tracing::debug!(x, y, width = w, height = h, "Drawing image watermark");

    if let Some(mut base) = canvas.as_image_mut() {
        imageops::overlay(&mut base, &layer, x, y);
    }
}
