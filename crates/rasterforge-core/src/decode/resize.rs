//! Resampling helpers built on the `image` crate's filters.
//!
//! All functions return new rasters without modifying the input.

use image::imageops;
use serde::{Deserialize, Serialize};

use super::{DecodeError, Raster};
use crate::geometry::Rect;

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor (fastest, lowest quality).
    Nearest,
    /// Bilinear (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 (slower, highest quality). Used for final renders.
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize a raster to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the dimensions.
pub fn resize(
    raster: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    resize_region(
        raster,
        Rect::new(0, 0, raster.width, raster.height),
        width,
        height,
        filter,
    )
}

/// Resample the `region` of `raster` to `width x height`.
///
/// The region is clipped to the raster bounds first. A region that already
/// matches the target size is copied without filtering.
pub fn resize_region(
    raster: &Raster,
    region: Rect,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    let region = region.clip_to(raster.width, raster.height);
    if region.w == 0 || region.h == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    let rgba = raster
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let view = imageops::crop_imm(&rgba, region.x, region.y, region.w, region.h);

    // Fast path: same size, just copy the region
    if region.w == width && region.h == height {
        return Ok(Raster::from_rgba_image(view.to_image()));
    }

    let resized = imageops::resize(&*view, width, height, filter.to_image_filter());
    Ok(Raster::from_rgba_image(resized))
}
