//! Laplacian sharpen.
//!
//! ```text
//!  0  -s   0
//! -s 1+4s -s
//!  0  -s   0
//! ```
//!
//! Out-of-bounds neighbors reuse the nearest edge pixel. Only RGB is
//! convolved; alpha passes through.

use crate::decode::Raster;

/// Maximum sharpen strength.
pub const MAX_STRENGTH: f32 = 3.0;

/// Sharpen `raster` in place. `strength` is clamped to `[0, 3]`; 0 is a no-op.
pub fn sharpen(raster: &mut Raster, strength: f32) {
    let s = if strength.is_finite() {
        strength.clamp(0.0, MAX_STRENGTH)
    } else {
        0.0
    };
    if s == 0.0 || raster.is_empty() {
        return;
    }

    let w = raster.width as usize;
    let h = raster.height as usize;
    let center = 1.0 + 4.0 * s;
    // Convolve from an untouched copy of the input
    let src = raster.pixels.clone();

    for y in 0..h {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(h - 1);
        for x in 0..w {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(w - 1);

            let idx = (y * w + x) * 4;
            let l = (y * w + left) * 4;
            let r = (y * w + right) * 4;
            let u = (up * w + x) * 4;
            let d = (down * w + x) * 4;

            for c in 0..3 {
                let value = center * src[idx + c] as f32
                    - s * (src[l + c] as f32
                        + src[r + c] as f32
                        + src[u + c] as f32
                        + src[d + c] as f32);
                raster.pixels[idx + c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
