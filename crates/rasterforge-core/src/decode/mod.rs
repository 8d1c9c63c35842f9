//! Decoding side of the raster codec.
//!
//! This module provides:
//! - The [`Raster`] type every pipeline stage operates on
//! - Decoding encoded bytes (PNG, JPEG, WebP) into RGBA rasters
//! - EXIF orientation correction at decode time
//! - Resampling helpers used by the compositor and watermark stages
//!
//! # Architecture
//!
//! Decoding is one half of the raster codec boundary. Everything after
//! decode is pure pixel math on owned rasters; nothing here keeps state
//! between calls.

mod reader;
mod resize;
mod types;

pub use reader::decode_raster;
pub use resize::{resize, resize_region, FilterType};
pub use types::{DecodeError, Orientation, Raster};
