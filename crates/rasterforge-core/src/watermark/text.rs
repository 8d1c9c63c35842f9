//! Text watermark with a soft drop shadow.
//!
//! The label is rasterized into its own layer (shadow underneath, text on
//! top), then drawn onto the canvas rotated about the label's visual center.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::filter::gaussian_blur_f32;

use super::anchor::{text_anchor, LabelMetrics};
use crate::decode::Raster;
use crate::options::WatermarkTextSpec;
use crate::transform::{draw_transformed, Affine};

/// Gaussian sigma of the drop shadow.
pub const SHADOW_SIGMA: f32 = 2.0;
/// Shadow offset in pixels, right and down.
pub const SHADOW_OFFSET: u32 = 1;
/// Shadow alpha, 0 to 1.
pub const SHADOW_ALPHA: f32 = 0.5;

/// Room around the glyph box for the blurred shadow.
const MARGIN: u32 = 8;

/// Glyph scale for a font size of `size` pixels per em.
///
/// `PxScale` is the ascent-to-descent height, which is larger than the em
/// square for most fonts.
pub fn em_scale(font: &FontArc, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or_else(|| font.height_unscaled());
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

/// Measure one line of `text` at `size` pixels per em.
pub fn measure_label(font: &FontArc, size: f32, text: &str) -> LabelMetrics {
    let scale = em_scale(font, size);
    let scaled = font.as_scaled(scale);
    let (width, _) = text_size(scale, font, text);
    LabelMetrics {
        width: width as f32,
        height: scaled.ascent() - scaled.descent(),
        ascent: scaled.ascent(),
    }
}

/// Draw the text watermark onto `canvas`.
///
/// No-op for empty or whitespace-only text and for zero opacity.
pub fn apply_text_watermark(canvas: &mut Raster, spec: &WatermarkTextSpec, font: &FontArc) {
    let opacity = spec.opacity.clamp(0.0, 1.0);
    if spec.text.trim().is_empty() || opacity <= 0.0 || canvas.is_empty() {
        return;
    }

    let metrics = measure_label(font, spec.size, &spec.text);
    let scale = em_scale(font, spec.size);
    let (x, top) = text_anchor(
        (canvas.width, canvas.height),
        metrics,
        spec.size,
        spec.position,
        spec.padding,
    );
    let (x, top) = (x.round() as f64, top.round() as f64);

    let layer = render_label(font, scale, spec, metrics);

    let cx = x + metrics.width as f64 / 2.0;
    let cy = top + metrics.height as f64 / 2.0;
    let margin = MARGIN as f64;
    let transform = Affine::rotate_about(spec.rotate, cx, cy)
        .then(&Affine::translate(x - margin, top - margin));

    tracing::debug!(
        x,
        y = top,
        width = metrics.width,
        rotate = spec.rotate,
        "Drawing text watermark"
    );
    draw_transformed(canvas, &layer, &transform, opacity);
}

/// Rasterize the label with its shadow. The line box starts at `(MARGIN, MARGIN)`.
fn render_label(
    font: &FontArc,
    scale: PxScale,
    spec: &WatermarkTextSpec,
    metrics: LabelMetrics,
) -> RgbaImage {
    let w = metrics.width.ceil().max(1.0) as u32 + 2 * MARGIN;
    let h = metrics.height.ceil().max(1.0) as u32 + 2 * MARGIN;

    // Glyph coverage
    let mut mask = GrayImage::new(w, h);
    draw_text_mut(
        &mut mask,
        Luma([255]),
        MARGIN as i32,
        MARGIN as i32,
        scale,
        font,
        &spec.text,
    );

    let mut layer = RgbaImage::from_fn(w, h, |px, py| {
        if px < SHADOW_OFFSET || py < SHADOW_OFFSET {
            return Rgba([0, 0, 0, 0]);
        }
        let coverage = mask.get_pixel(px - SHADOW_OFFSET, py - SHADOW_OFFSET)[0] as f32;
        Rgba([0, 0, 0, (coverage * SHADOW_ALPHA).round() as u8])
    });
    layer = gaussian_blur_f32(&layer, SHADOW_SIGMA);

    let color = spec.rgba();
    for (px, py, coverage) in mask.enumerate_pixels() {
        let m = coverage[0];
        if m == 0 {
            continue;
        }
        let alpha = (m as f32 * color[3] as f32 / 255.0).round() as u8;
        layer
            .get_pixel_mut(px, py)
            .blend(&Rgba([color[0], color[1], color[2], alpha]));
    }

    layer
}
