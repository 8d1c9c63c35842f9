//! Byte-to-raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, Raster};
use crate::encode::normalize_mime;

/// Decode encoded image bytes into an RGBA raster, applying EXIF orientation.
///
/// The format is sniffed from the bytes; `mime_hint` is only consulted when
/// sniffing fails.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for empty input, `DecodeError::InvalidFormat`
/// if no decoder matches and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_raster(bytes: &[u8], mime_hint: Option<&str>) -> Result<Raster, DecodeError> {
    let img = decode_dynamic(bytes, mime_hint)?;
    let oriented = apply_orientation(img, extract_orientation(bytes));
    Ok(Raster::from_rgba_image(oriented.into_rgba8()))
}

fn decode_dynamic(bytes: &[u8], mime_hint: Option<&str>) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        let hinted = mime_hint
            .map(normalize_mime)
            .and_then(ImageFormat::from_mime_type);
        match hinted {
            Some(format) => reader.set_format(format),
            None => return Err(DecodeError::InvalidFormat),
        }
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read the EXIF orientation tag, `Normal` when there is none.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 200, 255])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let raster = decode_raster(&png_bytes(8, 4), Some("image/png")).unwrap();
        assert_eq!((raster.width, raster.height), (8, 4));
        assert_eq!(raster.byte_size(), 8 * 4 * 4);
        assert_eq!(raster.pixel(3, 2), [30, 20, 200, 255]);
    }

    #[test]
    fn test_decode_ignores_wrong_mime_hint() {
        // Sniffing wins over the hint
        let raster = decode_raster(&png_bytes(2, 2), Some("image/jpeg")).unwrap();
        assert_eq!(raster.width, 2);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_raster(&[], None), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_garbage_without_hint() {
        let result = decode_raster(&[0x00, 0x01, 0x02, 0x03], None);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_garbage_with_hint_is_corrupted() {
        let result = decode_raster(&[0x00, 0x01, 0x02, 0x03], Some("image/png"));
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(16, 16);
        let result = decode_raster(&bytes[..bytes.len() / 2], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_orientation_defaults_to_normal_without_exif() {
        assert_eq!(extract_orientation(&png_bytes(2, 2)), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(6, 3));
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (3, 6));
    }
}
