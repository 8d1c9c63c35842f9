//! Geometry planning: crop rectangle, resize plan and canvas size.
//!
//! Everything here is pure integer/float math on dimensions; no pixels are
//! touched. The compositor consumes the resulting [`GeometryPlan`].
//!
//! # Order
//!
//! 1. The crop rectangle is clamped to the source (or is the full source).
//! 2. The resize plan is computed against the *cropped* size.
//! 3. The canvas takes the resize output size, swapped for right-angle rotations.
//!
//! Resize targets are capped at [`MAX_CANVAS_DIMENSION`] per side, the largest
//! canvas browsers will allocate, so pixel buffer sizes always fit in `usize`.

use crate::options::{CropSpec, RenderPlan, ResizeMode, ResizeSpec};

/// Largest width or height a resize may produce.
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Intersect with `[0, width) x [0, height)`.
    pub fn clip_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            w: self.w.min(width - x),
            h: self.h.min(height - y),
        }
    }
}

/// Output size and the sub-rectangle of the cropped source to sample.
///
/// `sx`/`sy` are relative to the cropped source, not the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub w: u32,
    pub h: u32,
    pub sx: u32,
    pub sy: u32,
    pub sw: u32,
    pub sh: u32,
}

impl ResizePlan {
    /// Sample the whole `w x h` source and output it unchanged.
    pub fn identity(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            sx: 0,
            sy: 0,
            sw: w,
            sh: h,
        }
    }
}

/// The complete geometry of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryPlan {
    /// Crop rectangle in source coordinates.
    pub base: Rect,
    pub resize: ResizePlan,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl GeometryPlan {
    /// The rectangle to sample, in source coordinates.
    pub fn sample_rect(&self) -> Rect {
        Rect::new(
            self.base.x + self.resize.sx,
            self.base.y + self.resize.sy,
            self.resize.sw,
            self.resize.sh,
        )
    }
}

/// Plan the geometry for a `src_w x src_h` source.
///
/// Zero-sized sources are treated as 1x1 so every returned dimension stays positive.
pub fn plan(src_w: u32, src_h: u32, options: &RenderPlan) -> GeometryPlan {
    let src_w = src_w.max(1);
    let src_h = src_h.max(1);

    let base = clamp_crop(src_w, src_h, &options.crop);
    let resize = plan_resize(base.w, base.h, &options.resize);
    let (canvas_width, canvas_height) = canvas_size(&resize, options.rotate.degrees);

    GeometryPlan {
        base,
        resize,
        canvas_width,
        canvas_height,
    }
}

/// Clamp the crop to the source. A disabled crop is the full source.
///
/// Values are truncated toward zero; non-finite values count as zero.
pub fn clamp_crop(src_w: u32, src_h: u32, crop: &CropSpec) -> Rect {
    if !crop.enabled {
        return Rect::new(0, 0, src_w, src_h);
    }

    let x = clamp_trunc(crop.x, 0, src_w - 1);
    let y = clamp_trunc(crop.y, 0, src_h - 1);
    let w = clamp_trunc(crop.w, 1, src_w - x);
    let h = clamp_trunc(crop.h, 1, src_h - y);

    Rect::new(x, y, w, h)
}

/// Compute the resize plan for a cropped source of `src_w x src_h`.
pub fn plan_resize(src_w: u32, src_h: u32, resize: &ResizeSpec) -> ResizePlan {
    if !resize.enabled {
        return ResizePlan::identity(src_w, src_h);
    }

    let cap = |v: f64| clamp_trunc(v, 1, MAX_CANVAS_DIMENSION);
    let target_w = resize.width.map_or(src_w, cap);
    let target_h = resize.height.map_or(src_h, cap);

    match resize.mode {
        ResizeMode::Exact => ResizePlan {
            w: target_w,
            h: target_h,
            ..ResizePlan::identity(src_w, src_h)
        },
        ResizeMode::Contain => {
            let (w, h) = contain_dimensions((src_w, src_h), (target_w, target_h));
            ResizePlan {
                w,
                h,
                ..ResizePlan::identity(src_w, src_h)
            }
        }
        ResizeMode::Cover => {
            let (sx, sy, sw, sh) = cover_sample((src_w, src_h), (target_w, target_h));
            ResizePlan {
                w: target_w,
                h: target_h,
                sx,
                sy,
                sw,
                sh,
            }
        }
    }
}

/// Largest size inside `target` with the aspect ratio of `source`.
pub fn contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let src_ratio = source.0 as f64 / source.1 as f64;
    let (target_w, target_h) = target;

    let mut out_w = target_w;
    let mut out_h = (out_w as f64 / src_ratio).round() as u32;
    if out_h > target_h {
        out_h = target_h;
        out_w = (out_h as f64 * src_ratio).round() as u32;
    }

    (out_w.clamp(1, target_w), out_h.clamp(1, target_h))
}

/// Centered sub-rectangle of `source` with the aspect ratio of `target`.
///
/// Returns `(sx, sy, sw, sh)`.
pub fn cover_sample(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let src_ratio = src_w as f64 / src_h as f64;
    let target_ratio = target.0 as f64 / target.1 as f64;

    if src_ratio > target_ratio {
        // Source is wider: keep full height, crop width
        let sw = ((src_h as f64 * target_ratio).round() as u32).clamp(1, src_w);
        ((src_w - sw) / 2, 0, sw, src_h)
    } else {
        // Source is taller (or equal): keep full width, crop height
        let sh = ((src_w as f64 / target_ratio).round() as u32).clamp(1, src_h);
        (0, (src_h - sh) / 2, src_w, sh)
    }
}

/// True when `|degrees| mod 180 == 90`.
pub fn is_right_angle(degrees: f64) -> bool {
    degrees.is_finite() && ((degrees.abs() % 180.0) - 90.0).abs() < 1e-9
}

/// Canvas size for a resize output drawn with `rotate_degrees`.
///
/// Right-angle rotations swap width and height; any other angle keeps the
/// size and lets the corners clip.
pub fn canvas_size(resize: &ResizePlan, rotate_degrees: f64) -> (u32, u32) {
    if is_right_angle(rotate_degrees) {
        (resize.h, resize.w)
    } else {
        (resize.w, resize.h)
    }
}

#[inline]
fn clamp_trunc(value: f64, min: u32, max: u32) -> u32 {
    let v = if value.is_finite() { value.trunc() } else { 0.0 };
    v.clamp(min as f64, max as f64) as u32
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=4000, 1u32..=4000)
    }

    fn target_strategy() -> impl Strategy<Value = (f64, f64)> {
        (1.0f64..=3000.0, 1.0f64..=3000.0)
    }

    fn spec(mode: ResizeMode, (w, h): (f64, f64)) -> ResizeSpec {
        ResizeSpec {
            enabled: true,
            mode,
            width: Some(w),
            height: Some(h),
        }
    }

    proptest! {
        /// Property: the clamped crop always lies inside the source.
        #[test]
        fn prop_crop_within_source(
            (src_w, src_h) in dimensions_strategy(),
            x in -100.0f64..5000.0,
            y in -100.0f64..5000.0,
            w in -100.0f64..5000.0,
            h in -100.0f64..5000.0,
        ) {
            let rect = clamp_crop(src_w, src_h, &CropSpec { enabled: true, x, y, w, h });
            prop_assert!(rect.x < src_w && rect.y < src_h);
            prop_assert!(rect.w >= 1 && rect.h >= 1);
            prop_assert!(rect.x + rect.w <= src_w);
            prop_assert!(rect.y + rect.h <= src_h);
        }

        /// Property: exact output is the floored target.
        #[test]
        fn prop_exact_matches_target(
            (src_w, src_h) in dimensions_strategy(),
            target in target_strategy(),
        ) {
            let p = plan_resize(src_w, src_h, &spec(ResizeMode::Exact, target));
            prop_assert_eq!((p.w, p.h), (target.0 as u32, target.1 as u32));
        }

        /// Property: contain stays inside the bounds and keeps the aspect ratio.
        #[test]
        fn prop_contain_within_bounds(
            (src_w, src_h) in dimensions_strategy(),
            target in target_strategy(),
        ) {
            let p = plan_resize(src_w, src_h, &spec(ResizeMode::Contain, target));
            let (tw, th) = (target.0 as u32, target.1 as u32);
            prop_assert!(p.w >= 1 && p.h >= 1);
            prop_assert!(p.w <= tw && p.h <= th);

            // Aspect ratio within one pixel of rounding on the derived axis
            let ratio = src_w as f64 / src_h as f64;
            let from_w = (p.w as f64 / ratio - p.h as f64).abs();
            let from_h = (p.h as f64 * ratio - p.w as f64).abs();
            prop_assert!(from_w <= 1.0 || from_h <= 1.0 || p.w == 1 || p.h == 1);
        }

        /// Property: cover output is the target and the sample stays inside the source.
        #[test]
        fn prop_cover_sample_inside_source(
            (src_w, src_h) in dimensions_strategy(),
            target in target_strategy(),
        ) {
            let p = plan_resize(src_w, src_h, &spec(ResizeMode::Cover, target));
            prop_assert_eq!((p.w, p.h), (target.0 as u32, target.1 as u32));
            prop_assert!(p.sw >= 1 && p.sh >= 1);
            prop_assert!(p.sx + p.sw <= src_w);
            prop_assert!(p.sy + p.sh <= src_h);
        }

        /// Property: the full plan never produces a zero dimension.
        #[test]
        fn prop_canvas_positive(
            (src_w, src_h) in dimensions_strategy(),
            target in target_strategy(),
            degrees in -720.0f64..720.0,
        ) {
            let mut options = RenderPlan::default();
            options.resize = spec(ResizeMode::Cover, target);
            options.rotate.degrees = degrees;
            let p = plan(src_w, src_h, &options);
            prop_assert!(p.canvas_width >= 1 && p.canvas_height >= 1);
            let s = p.sample_rect();
            prop_assert!(s.x + s.w <= src_w && s.y + s.h <= src_h);
        }
    }
}
