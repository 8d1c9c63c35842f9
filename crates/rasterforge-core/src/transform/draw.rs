//! Drawing a source image through an affine transform.
//!
//! Uses inverse mapping: for each destination pixel center we compute the
//! source position and interpolate bilinearly, then composite source-over.
//!
//! ```text
//! src = M⁻¹ · (dst_x + 0.5, dst_y + 0.5)
//! ```
//!
//! Interpolation happens on premultiplied values so transparent neighbors
//! do not bleed dark fringes into edges.

use image::RgbaImage;

use super::Affine;
use crate::decode::Raster;

/// Draw `src` onto `dst` through `transform` at `opacity` (0 to 1).
///
/// `transform` maps source pixel space onto destination pixel space.
/// Destination pixels whose centers fall outside the transformed source are
/// left untouched, so rotated corners clip instead of failing.
pub fn draw_transformed(dst: &mut Raster, src: &RgbaImage, transform: &Affine, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0) as f64;
    if opacity <= 0.0 || src.width() == 0 || src.height() == 0 || dst.is_empty() {
        return;
    }
    let Some(inverse) = transform.invert() else {
        return;
    };

    let (src_w, src_h) = (src.width() as f64, src.height() as f64);
    let Some((x0, y0, x1, y1)) = destination_bounds(transform, src_w, src_h, dst) else {
        return;
    };

    let dst_w = dst.width as usize;
    for dst_y in y0..y1 {
        for dst_x in x0..x1 {
            let (u, v) = inverse.apply(dst_x as f64 + 0.5, dst_y as f64 + 0.5);
            if u < 0.0 || v < 0.0 || u >= src_w || v >= src_h {
                continue;
            }

            let sample = sample_bilinear_premul(src, u - 0.5, v - 0.5);
            let idx = (dst_y as usize * dst_w + dst_x as usize) * 4;
            blend_over(&mut dst.pixels[idx..idx + 4], sample, opacity);
        }
    }
}

/// Integer bounding box of the transformed source, clipped to `dst`.
fn destination_bounds(
    transform: &Affine,
    src_w: f64,
    src_h: f64,
    dst: &Raster,
) -> Option<(u32, u32, u32, u32)> {
    let corners = [
        transform.apply(0.0, 0.0),
        transform.apply(src_w, 0.0),
        transform.apply(0.0, src_h),
        transform.apply(src_w, src_h),
    ];
    let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return None;
    }

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(dst.width);
    let y1 = (max_y.ceil().max(0.0) as u32).min(dst.height);

    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Premultiplied RGBA at pixel `(px, py)`, components in 0..1.
#[inline]
fn premul_at(src: &RgbaImage, px: u32, py: u32) -> [f64; 4] {
    let p = src.get_pixel(px, py).0;
    let a = p[3] as f64 / 255.0;
    [
        p[0] as f64 / 255.0 * a,
        p[1] as f64 / 255.0 * a,
        p[2] as f64 / 255.0 * a,
        a,
    ]
}

/// Bilinear sample with edge clamping, in premultiplied space.
///
/// `(x, y)` is in pixel-index space: `(0, 0)` is the center of the first pixel.
fn sample_bilinear_premul(src: &RgbaImage, x: f64, y: f64) -> [f64; 4] {
    let max_x = (src.width() - 1) as f64;
    let max_y = (src.height() - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premul_at(src, x0, y0);
    let p10 = premul_at(src, x1, y0);
    let p01 = premul_at(src, x0, y1);
    let p11 = premul_at(src, x1, y1);

    let mut out = [0.0f64; 4];
    for i in 0..4 {
        out[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    out
}

/// Source-over composite of a premultiplied sample onto a straight-alpha pixel.
#[inline]
fn blend_over(dst: &mut [u8], src_premul: [f64; 4], opacity: f64) {
    let sa = src_premul[3] * opacity;
    if sa <= 0.0 {
        return;
    }

    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }

    for i in 0..3 {
        let s = src_premul[i] * opacity;
        let d = dst[i] as f64 / 255.0 * da;
        let c = (s + d * (1.0 - sa)) / out_a;
        dst[i] = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 3x2 image with a distinct opaque color per pixel.
    fn pattern() -> RgbaImage {
        RgbaImage::from_fn(3, 2, |x, y| Rgba([(x * 80) as u8, (y * 200) as u8, 7, 255]))
    }

    #[test]
    fn test_identity_draw_copies_pixels() {
        let src = pattern();
        let mut dst = Raster::transparent(3, 2);
        draw_transformed(&mut dst, &src, &Affine::identity(), 1.0);
        assert_eq!(dst.pixels, src.into_raw());
    }

    #[test]
    fn test_rotation_90_about_canvas_center() {
        // 3x2 source onto a 2x3 canvas, pivot at the canvas center
        let src = pattern();
        let m = Affine::translate(1.0, 1.5)
            .then(&Affine::rotate(90.0))
            .then(&Affine::translate(-1.5, -1.0));
        let mut dst = Raster::transparent(2, 3);
        draw_transformed(&mut dst, &src, &m, 1.0);

        // Clockwise: the source's bottom-left lands at the top-left
        assert_eq!(dst.pixel(0, 0), src.get_pixel(0, 1).0);
        assert_eq!(dst.pixel(1, 0), src.get_pixel(0, 0).0);
        assert_eq!(dst.pixel(0, 2), src.get_pixel(2, 1).0);
        assert!(!dst.has_transparency());
    }

    #[test]
    fn test_horizontal_flip() {
        let src = pattern();
        let m = Affine::translate(1.5, 1.0)
            .then(&Affine::scale(-1.0, 1.0))
            .then(&Affine::translate(-1.5, -1.0));
        let mut dst = Raster::transparent(3, 2);
        draw_transformed(&mut dst, &src, &m, 1.0);
        assert_eq!(dst.pixel(0, 0), src.get_pixel(2, 0).0);
        assert_eq!(dst.pixel(2, 1), src.get_pixel(0, 1).0);
    }

    #[test]
    fn test_zero_opacity_is_noop() {
        let mut dst = Raster::filled(3, 2, Rgba([1, 2, 3, 255]));
        let before = dst.clone();
        draw_transformed(&mut dst, &pattern(), &Affine::identity(), 0.0);
        assert_eq!(dst, before);
    }

    #[test]
    fn test_half_opacity_blends() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let mut dst = Raster::filled(2, 2, Rgba([0, 0, 0, 255]));
        draw_transformed(&mut dst, &src, &Affine::identity(), 0.5);
        assert_eq!(dst.pixel(1, 1), [128, 128, 128, 255]);
    }

    #[test]
    fn test_draw_outside_canvas_is_clipped() {
        let mut dst = Raster::transparent(4, 4);
        draw_transformed(&mut dst, &pattern(), &Affine::translate(100.0, 100.0), 1.0);
        assert_eq!(dst, Raster::transparent(4, 4));
    }

    #[test]
    fn test_non_right_angle_clips_corners() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255]));
        let m = Affine::rotate_about(45.0, 10.0, 10.0);
        let mut dst = Raster::transparent(20, 20);
        draw_transformed(&mut dst, &src, &m, 1.0);
        assert_eq!(dst.pixel(0, 0)[3], 0);
        assert_eq!(dst.pixel(10, 10), [255, 0, 0, 255]);
    }

    #[test]
    fn test_blend_over_transparent_destination_keeps_color() {
        let mut px = [0u8, 0, 0, 0];
        blend_over(&mut px, [0.5, 0.0, 0.0, 0.5], 1.0);
        assert_eq!(px, [255, 0, 0, 128]);
    }
}
