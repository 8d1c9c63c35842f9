//! Watermark overlays.
//!
//! The image watermark is drawn first and the text watermark on top of it,
//! so a large logo never hides the label.
//!
//! Both stages are optional and skip silently when their input is missing:
//! no secondary raster, empty text, zero opacity or (for text) no font.

mod anchor;
mod image;
mod text;

pub use self::anchor::{place_box, text_anchor, Anchor, LabelMetrics};
pub use self::image::{apply_image_watermark, watermark_size};
pub use self::text::{
    apply_text_watermark, measure_label, SHADOW_ALPHA, SHADOW_OFFSET, SHADOW_SIGMA,
};

use ab_glyph::FontArc;

use crate::decode::Raster;
use crate::options::RenderPlan;

/// Apply both watermark stages in order.
///
/// `watermark` is the decoded secondary raster for `plan.watermark_image`.
pub fn apply_watermarks(
    canvas: &mut Raster,
    plan: &RenderPlan,
    watermark: Option<&Raster>,
    font: Option<&FontArc>,
) {
    if let (Some(spec), Some(raster)) = (&plan.watermark_image, watermark) {
        apply_image_watermark(canvas, raster, spec);
    }

    if let Some(spec) = &plan.watermark_text {
        if spec.text.trim().is_empty() {
            return;
        }
        match font {
            Some(font) => apply_text_watermark(canvas, spec, font),
            None => tracing::warn!("Text watermark requested but no font is available, skipping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{WatermarkImageSpec, WatermarkTextSpec};
    use ::image::Rgba;

    const DEJAVU: &[u8] = include_bytes!("../../testdata/DejaVuSans.ttf");

    #[test]
    fn test_absent_specs_are_noop() {
        let mut canvas = Raster::filled(20, 20, Rgba([5, 5, 5, 255]));
        let before = canvas.clone();
        apply_watermarks(&mut canvas, &RenderPlan::new(), None, None);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut canvas = Raster::filled(20, 20, Rgba([5, 5, 5, 255]));
        let before = canvas.clone();
        let mut plan = RenderPlan::new();
        plan.watermark_text = Some(WatermarkTextSpec {
            text: "hi".to_string(),
            ..Default::default()
        });
        apply_watermarks(&mut canvas, &plan, None, None);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_image_spec_without_raster_is_skipped() {
        let mut canvas = Raster::filled(20, 20, Rgba([5, 5, 5, 255]));
        let before = canvas.clone();
        let mut plan = RenderPlan::new();
        plan.watermark_image = Some(WatermarkImageSpec::default());
        apply_watermarks(&mut canvas, &plan, None, None);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_text_drawn_over_image() {
        let font = FontArc::try_from_slice(DEJAVU).unwrap();
        let mut canvas = Raster::filled(200, 200, Rgba([0, 0, 0, 255]));
        let mut plan = RenderPlan::new();
        plan.watermark_image = Some(WatermarkImageSpec {
            opacity: 1.0,
            scale: 1.0,
            position: Anchor::TopLeft,
            padding: 0.0,
            ..Default::default()
        });
        plan.watermark_text = Some(WatermarkTextSpec {
            text: "HHHH".to_string(),
            opacity: 1.0,
            color: "#ff0000".to_string(),
            position: Anchor::Center,
            ..Default::default()
        });
        let logo = Raster::filled(10, 10, Rgba([0, 0, 255, 255]));
        apply_watermarks(&mut canvas, &plan, Some(&logo), Some(&font));

        // The logo covers the whole canvas, the red label sits on top of it
        assert_eq!(canvas.pixel(0, 199), [0, 0, 255, 255]);
        assert!(canvas.pixels.chunks(4).any(|p| p[0] > 200 && p[2] < 50));
    }
}
