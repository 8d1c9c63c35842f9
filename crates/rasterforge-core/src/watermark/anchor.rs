//! Anchor placement for watermark boxes and text labels.

pub use crate::options::Anchor;

/// Top-left corner of a `size` box anchored in `canvas` with `padding`.
///
/// Coordinates may be negative when the box is larger than the canvas.
pub fn place_box(canvas: (u32, u32), size: (u32, u32), anchor: Anchor, padding: f32) -> (i64, i64) {
    let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
    let (w, h) = (size.0 as f64, size.1 as f64);
    let p = padding as f64;

    let (x, y) = match anchor {
        Anchor::TopLeft => (p, p),
        Anchor::TopRight => (cw - p - w, p),
        Anchor::BottomLeft => (p, ch - p - h),
        Anchor::BottomRight => (cw - p - w, ch - p - h),
        Anchor::Center => ((cw - w) / 2.0, (ch - h) / 2.0),
    };
    (x.round() as i64, y.round() as i64)
}

/// Measured extents of a single line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// Advance width in pixels.
    pub width: f32,
    /// Line height (ascent + descent) in pixels.
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
}

/// Top-left of the line box for a label anchored in `canvas`.
///
/// Corner anchors are baseline relative: top anchors put the baseline at
/// `padding + size` and bottom anchors at `canvas_h - padding`. Right anchors
/// right-align the advance width. `center` centers the line box on both axes.
pub fn text_anchor(
    canvas: (u32, u32),
    metrics: LabelMetrics,
    size: f32,
    anchor: Anchor,
    padding: f32,
) -> (f32, f32) {
    let (cw, ch) = (canvas.0 as f32, canvas.1 as f32);
    let left = padding;
    let right = cw - padding - metrics.width;
    let top_baseline = padding + size;
    let bottom_baseline = ch - padding;

    let (x, baseline) = match anchor {
        Anchor::TopLeft => (left, top_baseline),
        Anchor::TopRight => (right, top_baseline),
        Anchor::BottomLeft => (left, bottom_baseline),
        Anchor::BottomRight => (right, bottom_baseline),
        Anchor::Center => {
            return ((cw - metrics.width) / 2.0, (ch - metrics.height) / 2.0);
        }
    };
    (x, baseline - metrics.ascent)
}
