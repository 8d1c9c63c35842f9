//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG or WebP bytes into an RGBA raster
//! - [`resize`] - Resize a raster to exact dimensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@rasterforge/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const raster = decode_image(bytes, file.type);
//! const data = new ImageData(new Uint8ClampedArray(raster.pixels()), raster.width);
//! ```

use crate::types::{filter_from_u8, JsRaster};
use rasterforge_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image, applying EXIF orientation.
///
/// `mime` is only used when the format cannot be sniffed from the bytes;
/// pass an empty string when unknown.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], mime: &str) -> Result<JsRaster, JsValue> {
    let hint = Some(mime.trim()).filter(|m| !m.is_empty());
    decode::decode_raster(bytes, hint)
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize a raster to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(image: &JsRaster, width: u32, height: u32, filter: u8) -> Result<JsRaster, JsValue> {
    let raster = image.to_raster()?;
    decode::resize(&raster, width, height, filter_from_u8(filter))
        .map(JsRaster::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid() {
        assert!(decode_image(&[0, 1, 2, 3], "").is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_empty() {
        assert!(decode_image(&[], "image/png").is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_creates_new_image() {
        let img = JsRaster::new(10, 10, vec![128u8; 10 * 10 * 4]);
        let resized = resize(&img, 5, 4, 2).unwrap();
        assert_eq!(resized.width(), 5);
        assert_eq!(resized.height(), 4);
        assert_eq!(resized.byte_length(), 5 * 4 * 4);
    }

    #[wasm_bindgen_test]
    fn test_resize_rejects_bad_buffer() {
        let img = JsRaster::new(10, 10, vec![0u8; 7]);
        assert!(resize(&img, 5, 5, 1).is_err());
    }
}
