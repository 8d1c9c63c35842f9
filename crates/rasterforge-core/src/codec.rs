//! The raster codec boundary.
//!
//! Decoding bytes into a [`Raster`] and encoding it back are the only
//! blocking calls in a render. [`RasterCodec`] is the seam: [`ImageCodec`]
//! implements it on the `image` crate, and tests can substitute their own.

use image::Rgba;

use crate::decode::{decode_raster, DecodeError, Raster};
use crate::encode::{encode_raster, EncodeError, OutputFormat};
use crate::options::OutputSpec;

/// Decode and encode rasters.
pub trait RasterCodec: Send + Sync {
    /// Decode encoded bytes. `mime_hint` is consulted when sniffing fails.
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<Raster, DecodeError>;

    /// Encode `raster` as `format`. `quality` is 0 to 1; `background` fills
    /// transparent areas for opaque formats.
    fn encode(
        &self,
        raster: &Raster,
        format: OutputFormat,
        quality: f32,
        background: Rgba<u8>,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Codec backed by the `image` crate, with EXIF orientation correction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<Raster, DecodeError> {
        decode_raster(bytes, mime_hint)
    }

    fn encode(
        &self,
        raster: &Raster,
        format: OutputFormat,
        quality: f32,
        background: Rgba<u8>,
    ) -> Result<Vec<u8>, EncodeError> {
        encode_raster(raster, format, quality, background)
    }
}

/// Encoded output with the mime type actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Encode as requested by `output`, retrying once as PNG.
///
/// The retry happens when the requested format fails or yields no bytes.
/// A PNG request is not retried.
pub fn encode_with_fallback<C: RasterCodec + ?Sized>(
    codec: &C,
    raster: &Raster,
    output: &OutputSpec,
) -> Result<Encoded, EncodeError> {
    let format = OutputFormat::from_mime(&output.mime_type);
    let background = output.background();

    let first = match codec.encode(raster, format, output.quality, background) {
        Ok(bytes) if !bytes.is_empty() => {
            return Ok(Encoded {
                bytes,
                mime: format.mime(),
            })
        }
        Ok(_) => EncodeError::EmptyOutput(format),
        Err(e) => e,
    };

    if format == OutputFormat::Png {
        return Err(first);
    }

    tracing::warn!(
        requested = format.mime(),
        error = %first,
        "Encoding failed, retrying as PNG"
    );

    match codec.encode(raster, OutputFormat::Png, 1.0, background) {
        Ok(bytes) if !bytes.is_empty() => Ok(Encoded {
            bytes,
            mime: OutputFormat::Png.mime(),
        }),
        Ok(_) => Err(EncodeError::AllFormatsFailed {
            requested: format.mime().to_string(),
            message: format!("{first}; PNG encoder produced no output"),
        }),
        Err(e) => Err(EncodeError::AllFormatsFailed {
            requested: format.mime().to_string(),
            message: format!("{first}; {e}"),
        }),
    }
}
