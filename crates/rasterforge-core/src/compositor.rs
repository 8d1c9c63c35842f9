//! Draw the source into the output canvas.
//!
//! # Steps
//!
//! 1. Allocate the canvas, filled with the background for opaque formats
//! 2. Resample the sample rectangle to the resize output size (Lanczos3)
//! 3. Run the filter chain over the resampled image
//! 4. Draw it through the pivot transform centered on the canvas
//!
//! The pivot transform is
//!
//! ```text
//! T(canvas_w/2, canvas_h/2) · R(θ) · S(±1, ±1) · T(-w/2, -h/2)
//! ```
//!
//! where `(w, h)` is the resize output, i.e. the pre-rotation size.

use image::Rgba;

use crate::decode::{resize_region, FilterType, Raster};
use crate::filters::{apply_filters, filter_chain};
use crate::geometry::GeometryPlan;
use crate::options::{RenderPlan, TransformSpec};
use crate::transform::{draw_transformed, Affine};

/// Render `source` onto a new canvas as described by `geometry` and `plan`.
///
/// `opaque` selects a background-filled canvas (for formats without alpha).
pub fn composite(
    source: &Raster,
    geometry: &GeometryPlan,
    plan: &RenderPlan,
    opaque: bool,
) -> Raster {
    let mut canvas = allocate_canvas(geometry, opaque.then(|| plan.output.background()));

    let resize = geometry.resize;
    let Ok(resampled) = resize_region(
        source,
        geometry.sample_rect(),
        resize.w,
        resize.h,
        FilterType::Lanczos3,
    ) else {
        tracing::warn!(
            width = source.width,
            height = source.height,
            "Sample rectangle is empty, leaving canvas blank"
        );
        return canvas;
    };
    let Some(mut layer) = resampled.into_rgba_image() else {
        return canvas;
    };

    let ops = filter_chain(&plan.filters);
    if !ops.is_empty() {
        tracing::debug!(filter = %crate::filters::css_filter(&ops), "Applying filters");
        apply_filters(&mut layer, &ops);
    }

    let transform = pivot_transform(
        (canvas.width, canvas.height),
        (resize.w, resize.h),
        &plan.transform(),
    );
    draw_transformed(&mut canvas, &layer, &transform, 1.0);
    canvas
}

fn allocate_canvas(geometry: &GeometryPlan, background: Option<Rgba<u8>>) -> Raster {
    let (w, h) = (geometry.canvas_width, geometry.canvas_height);
    match background {
        Some(mut color) => {
            color.0[3] = 255;
            Raster::filled(w, h, color)
        }
        None => Raster::transparent(w, h),
    }
}

/// Transform taking resize-output pixels onto the canvas.
pub fn pivot_transform(canvas: (u32, u32), size: (u32, u32), transform: &TransformSpec) -> Affine {
    let flip_x = if transform.flip_h { -1.0 } else { 1.0 };
    let flip_y = if transform.flip_v { -1.0 } else { 1.0 };

    Affine::translate(canvas.0 as f64 / 2.0, canvas.1 as f64 / 2.0)
        .then(&Affine::rotate(transform.rotate_degrees))
        .then(&Affine::scale(flip_x, flip_y))
        .then(&Affine::translate(-(size.0 as f64) / 2.0, -(size.1 as f64) / 2.0))
}
