//! Raster encoding on the `image` crate's encoders.
//!
//! PNG and WebP are written losslessly with alpha. JPEG has no alpha
//! channel, so the raster is flattened onto a background color first.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba};
use std::io::Cursor;
use thiserror::Error;

use super::OutputFormat;
use crate::decode::Raster;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder reported an error
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },

    /// The encoder finished without producing any bytes
    #[error("{0:?} encoder produced no output")]
    EmptyOutput(OutputFormat),

    /// Neither the requested format nor the fallback could be produced
    #[error("Could not encode as {requested} or the lossless fallback: {message}")]
    AllFormatsFailed { requested: String, message: String },
}

/// Map a 0..1 quality to the JPEG encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 85;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode `raster` as `format`.
///
/// `quality` (0 to 1) only affects lossy formats. `background` is the fill
/// used for formats without alpha.
pub fn encode_raster(
    raster: &Raster,
    format: OutputFormat,
    quality: f32,
    background: Rgba<u8>,
) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;

    let bytes = match format {
        OutputFormat::Png => encode_png(raster)?,
        OutputFormat::Jpeg => encode_jpeg(raster, jpeg_quality(quality), background)?,
        OutputFormat::WebP => encode_webp(raster)?,
    };

    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput(format));
    }
    Ok(bytes)
}

fn validate(raster: &Raster) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected = raster.width as usize * raster.height as usize * 4;
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}

/// Encode as PNG (RGBA8).
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| failed(OutputFormat::Png, e))?;
    Ok(buffer.into_inner())
}

/// Encode as lossless WebP (RGBA8).
pub fn encode_webp(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;
    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| failed(OutputFormat::WebP, e))?;
    Ok(buffer.into_inner())
}

/// Encode as JPEG at `quality` (1-100), flattening alpha onto `background`.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses (default 85)
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    raster: &Raster,
    quality: u8,
    background: Rgba<u8>,
) -> Result<Vec<u8>, EncodeError> {
    validate(raster)?;
    let rgb = flatten(raster, background);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| failed(OutputFormat::Jpeg, e))?;
    Ok(buffer.into_inner())
}

/// Composite RGBA over an opaque background, producing packed RGB.
fn flatten(raster: &Raster, background: Rgba<u8>) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(raster.pixels.len() / 4 * 3);
    for p in raster.pixels.chunks_exact(4) {
        let a = p[3] as u32;
        for c in 0..3 {
            let v = (p[c] as u32 * a + background[c] as u32 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}

fn failed(format: OutputFormat, e: image::ImageError) -> EncodeError {
    EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
