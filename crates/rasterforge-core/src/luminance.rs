//! Luminance weights shared by the grayscale and saturate filters.
//!
//! The CSS Filter Effects color matrices are built from the ITU-R BT.709
//! luma coefficients, so both filters derive their rows from here.

/// ITU-R BT.709 coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.0722;

/// Row-major 3x3 color matrix applied to RGB.
pub type ColorMatrix = [[f32; 3]; 3];

/// The CSS `saturate(s)` matrix.
///
/// `s = 1` is the identity, `s = 0` is full desaturation onto luma.
pub fn saturate_matrix(s: f32) -> ColorMatrix {
    let (r, g, b) = (LUMINANCE_R, LUMINANCE_G, LUMINANCE_B);
    [
        [r + (1.0 - r) * s, g - g * s, b - b * s],
        [r - r * s, g + (1.0 - g) * s, b - b * s],
        [r - r * s, g - g * s, b + (1.0 - b) * s],
    ]
}

/// The CSS `grayscale(amount)` matrix, `amount` in `[0, 1]`.
///
/// Grayscale is saturate with `s = 1 - amount`.
pub fn grayscale_matrix(amount: f32) -> ColorMatrix {
    saturate_matrix(1.0 - amount.clamp(0.0, 1.0))
}

/// Apply a color matrix to normalized RGB.
#[inline]
pub fn apply_matrix(m: &ColorMatrix, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    (
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_saturate_one_is_identity() {
        let (r, g, b) = apply_matrix(&saturate_matrix(1.0), 0.2, 0.5, 0.9);
        assert!((r - 0.2).abs() < 1e-6);
        assert!((g - 0.5).abs() < 1e-6);
        assert!((b - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_full_grayscale_is_luminance() {
        let (r, g, b) = apply_matrix(&grayscale_matrix(1.0), 1.0, 0.0, 0.0);
        assert!((r - LUMINANCE_R).abs() < 1e-6);
        assert!((g - LUMINANCE_R).abs() < 1e-6);
        assert!((b - LUMINANCE_R).abs() < 1e-6);
    }

    #[test]
    fn test_matrices_preserve_gray() {
        for s in [0.0, 0.5, 2.0, 3.0] {
            let (r, g, b) = apply_matrix(&saturate_matrix(s), 0.4, 0.4, 0.4);
            assert!((r - 0.4).abs() < 1e-5 && (g - 0.4).abs() < 1e-5 && (b - 0.4).abs() < 1e-5);
        }
    }
}
