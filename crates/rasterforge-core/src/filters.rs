//! Color filter chain.
//!
//! [`filter_chain`] turns a [`FilterSpec`] into an ordered list of typed
//! operations, and [`apply_filters`] runs them as discrete passes.
//!
//! ## Filter Order
//! 1. Grayscale
//! 2. Blur
//! 3. Brightness
//! 4. Contrast
//! 5. Saturation
//!
//! The order is fixed. Only operations that differ from the identity are emitted.

use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

use crate::luminance::{apply_matrix, grayscale_matrix, saturate_matrix, ColorMatrix};
use crate::options::FilterSpec;

/// A single filter operation with its clamped parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Amount 0 to 1.
    Grayscale(f32),
    /// Gaussian standard deviation in pixels.
    Blur(f32),
    /// Percent, 100 is identity.
    Brightness(f32),
    /// Percent, 100 is identity.
    Contrast(f32),
    /// Percent, 100 is identity.
    Saturate(f32),
}

impl FilterOp {
    /// Canvas filter syntax for this operation.
    pub fn css(&self) -> String {
        match self {
            FilterOp::Grayscale(v) => format!("grayscale({v})"),
            FilterOp::Blur(v) => format!("blur({v}px)"),
            FilterOp::Brightness(v) => format!("brightness({v}%)"),
            FilterOp::Contrast(v) => format!("contrast({v}%)"),
            FilterOp::Saturate(v) => format!("saturate({v}%)"),
        }
    }
}

/// Build the ordered operation list for `spec`, clamping every parameter.
pub fn filter_chain(spec: &FilterSpec) -> Vec<FilterOp> {
    let spec = spec.clamped();
    let mut ops = Vec::with_capacity(5);

    if spec.grayscale > 0.0 {
        ops.push(FilterOp::Grayscale(spec.grayscale));
    }
    if spec.blur > 0.0 {
        ops.push(FilterOp::Blur(spec.blur));
    }
    if spec.brightness != 100.0 {
        ops.push(FilterOp::Brightness(spec.brightness));
    }
    if spec.contrast != 100.0 {
        ops.push(FilterOp::Contrast(spec.contrast));
    }
    if spec.saturation != 100.0 {
        ops.push(FilterOp::Saturate(spec.saturation));
    }

    ops
}

/// Join the chain into a single filter string, `none` when empty.
pub fn css_filter(ops: &[FilterOp]) -> String {
    if ops.is_empty() {
        return "none".to_string();
    }
    ops.iter().map(FilterOp::css).collect::<Vec<_>>().join(" ")
}

/// Apply each operation in order, one pass per operation.
///
/// Color operations leave alpha untouched. Blur filters every channel.
pub fn apply_filters(image: &mut RgbaImage, ops: &[FilterOp]) {
    for op in ops {
        match *op {
            FilterOp::Grayscale(amount) => apply_matrix_pass(image, &grayscale_matrix(amount)),
            FilterOp::Blur(sigma) => {
                if sigma > 0.0 {
                    *image = gaussian_blur_f32(image, sigma);
                }
            }
            FilterOp::Brightness(percent) => {
                let factor = percent / 100.0;
                apply_channel_pass(image, |c| c * factor);
            }
            FilterOp::Contrast(percent) => {
                let factor = percent / 100.0;
                apply_channel_pass(image, |c| (c - 0.5) * factor + 0.5);
            }
            FilterOp::Saturate(percent) => {
                apply_matrix_pass(image, &saturate_matrix(percent / 100.0))
            }
        }
    }
}

fn apply_matrix_pass(image: &mut RgbaImage, matrix: &ColorMatrix) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let (r, g, b) = apply_matrix(matrix, to_unit(r), to_unit(g), to_unit(b));
        pixel.0[0] = from_unit(r);
        pixel.0[1] = from_unit(g);
        pixel.0[2] = from_unit(b);
    }
}

fn apply_channel_pass(image: &mut RgbaImage, transfer: impl Fn(f32) -> f32) {
    // Per-value lookup table: the transfer only depends on the input byte
    let lut: [u8; 256] = std::array::from_fn(|i| from_unit(transfer(i as f32 / 255.0)));
    for pixel in image.pixels_mut() {
        for c in &mut pixel.0[..3] {
            *c = lut[*c as usize];
        }
    }
}

#[inline]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn from_unit(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    proptest! {
        /// Property: color filters never change alpha.
        #[test]
        fn prop_alpha_preserved(
            color in prop::array::uniform4(any::<u8>()),
            grayscale in 0.0f32..=1.0,
            brightness in 0.0f32..=300.0,
            contrast in 0.0f32..=300.0,
            saturation in 0.0f32..=300.0,
        ) {
            let mut img = RgbaImage::from_pixel(2, 2, Rgba(color));
            let spec = FilterSpec { grayscale, blur: 0.0, brightness, contrast, saturation };
            let ops = filter_chain(&spec);
            apply_filters(&mut img, &ops);
            for p in img.pixels() {
                prop_assert_eq!(p.0[3], color[3]);
            }
        }

        /// Property: the chain never has more than one op of each kind.
        #[test]
        fn prop_chain_bounded(
            grayscale in -5.0f32..5.0,
            blur in -5.0f32..50.0,
            brightness in -50.0f32..500.0,
        ) {
            let spec = FilterSpec {
                grayscale,
                blur,
                brightness,
                contrast: 100.0,
                saturation: 100.0,
            };
            let ops = filter_chain(&spec);
            prop_assert!(ops.len() <= 3);
        }
    }
}
