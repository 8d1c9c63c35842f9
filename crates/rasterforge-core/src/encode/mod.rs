//! Encoding side of the raster codec.
//!
//! This module provides:
//! - [`OutputFormat`] and mime normalization
//! - PNG, JPEG and WebP writers for [`Raster`](crate::decode::Raster)
//!
//! All operations are synchronous and single-threaded, so they can run
//! inside a Web Worker through the WASM bindings unchanged.

mod format;
mod writer;

pub use format::{normalize_mime, OutputFormat};
pub use writer::{
    encode_jpeg, encode_png, encode_raster, encode_webp, jpeg_quality, EncodeError,
};
