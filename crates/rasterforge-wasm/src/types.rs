//! WASM-compatible wrapper types for rasters and encoded output.

use rasterforge_core::decode::{FilterType, Raster};
use rasterforge_core::Encoded;
use wasm_bindgen::prelude::*;

/// An RGBA raster for JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a
/// `Uint8Array`, which can be wrapped in an `ImageData` for a canvas.
#[wasm_bindgen]
pub struct JsRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from dimensions and RGBA pixel data (4 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRaster {
        JsRaster {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA pixel data as a Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases it otherwise.
    pub fn free(self) {}
}

impl JsRaster {
    pub(crate) fn from_raster(raster: Raster) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }

    /// Copy into a core raster, checking the buffer length.
    pub(crate) fn to_raster(&self) -> Result<Raster, JsValue> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {expected} bytes (width * height * 4), got {}",
                self.pixels.len()
            )));
        }
        Ok(Raster::new(self.width, self.height, self.pixels.clone()))
    }
}

/// Encoded image bytes with the mime type actually produced.
///
/// Seen from JavaScript as `{encodedBytes, outputMime}`.
#[wasm_bindgen]
pub struct JsEncoded {
    encoded_bytes: Vec<u8>,
    output_mime: String,
}

#[wasm_bindgen]
impl JsEncoded {
    /// Encoded bytes as a Uint8Array (a copy).
    #[wasm_bindgen(getter = encodedBytes)]
    pub fn encoded_bytes(&self) -> Vec<u8> {
        self.encoded_bytes.clone()
    }

    /// Output mime type, e.g. `image/png` after a fallback.
    #[wasm_bindgen(getter = outputMime)]
    pub fn output_mime(&self) -> String {
        self.output_mime.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.encoded_bytes.len()
    }
}

impl From<Encoded> for JsEncoded {
    fn from(encoded: Encoded) -> Self {
        Self {
            encoded_bytes: encoded.bytes,
            output_mime: encoded.mime.to_string(),
        }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Lanczos3.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_creation() {
        let img = JsRaster::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_from_raster_keeps_pixels() {
        let raster = Raster::new(1, 1, vec![1, 2, 3, 4]);
        let js = JsRaster::from_raster(raster);
        assert_eq!(js.pixels(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_to_raster_accepts_matching_buffer() {
        let js = JsRaster::new(2, 1, vec![9u8; 8]);
        let raster = js.to_raster().ok().unwrap();
        assert_eq!((raster.width, raster.height), (2, 1));
    }

    #[test]
    fn test_encoded_from_core() {
        let js = JsEncoded::from(Encoded {
            bytes: vec![1, 2, 3],
            mime: "image/png",
        });
        assert_eq!(js.output_mime(), "image/png");
        assert_eq!(js.encoded_bytes(), vec![1, 2, 3]);
        assert_eq!(js.byte_length(), 3);
    }

    #[test]
    fn test_filter_from_u8() {
        assert!(matches!(filter_from_u8(0), FilterType::Nearest));
        assert!(matches!(filter_from_u8(1), FilterType::Bilinear));
        assert!(matches!(filter_from_u8(2), FilterType::Lanczos3));
        assert!(matches!(filter_from_u8(255), FilterType::Lanczos3));
    }
}
