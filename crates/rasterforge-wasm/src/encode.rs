//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@rasterforge/wasm';
//!
//! const out = encode_image(raster, 'image/jpeg', 0.85, '#ffffff');
//! const blob = new Blob([out.encodedBytes], { type: out.outputMime });
//! ```

use crate::types::{JsEncoded, JsRaster};
use rasterforge_core::options::OutputSpec;
use rasterforge_core::{encode_with_fallback, ImageCodec};
use wasm_bindgen::prelude::*;

/// Encode a raster as `mime`, falling back to PNG if that fails.
///
/// * `quality` - 0.05 to 1, used by JPEG only
/// * `background` - fill color for formats without alpha (`#rrggbb`)
///
/// Unknown mime types encode as PNG. The returned `outputMime` is the format
/// actually produced.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsRaster,
    mime: &str,
    quality: f32,
    background: &str,
) -> Result<JsEncoded, JsValue> {
    let raster = image.to_raster()?;
    let output = output_spec(mime, quality, background);
    encode_with_fallback(&ImageCodec, &raster, &output)
        .map(JsEncoded::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn output_spec(mime: &str, quality: f32, background: &str) -> OutputSpec {
    let defaults = OutputSpec::default();
    OutputSpec {
        mime_type: mime.to_string(),
        quality: if quality.is_finite() {
            quality.clamp(0.05, 1.0)
        } else {
            defaults.quality
        },
        jpeg_background: if background.trim().is_empty() {
            defaults.jpeg_background
        } else {
            background.to_string()
        },
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png() {
        let img = JsRaster::new(4, 4, vec![200u8; 4 * 4 * 4]);
        let out = encode_image(&img, "image/png", 1.0, "").unwrap();
        assert_eq!(out.output_mime(), "image/png");
        assert_eq!(&out.encoded_bytes()[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encoded_exposes_wire_field_names() {
        let img = JsRaster::new(2, 2, vec![90u8; 2 * 2 * 4]);
        let out = JsValue::from(encode_image(&img, "image/png", 0.8, "").unwrap());
        let mime = js_sys::Reflect::get(&out, &"outputMime".into()).unwrap();
        assert_eq!(mime.as_string().as_deref(), Some("image/png"));
        let bytes = js_sys::Reflect::get(&out, &"encodedBytes".into()).unwrap();
        assert!(bytes.is_instance_of::<js_sys::Uint8Array>());
        assert!(js_sys::Reflect::get(&out, &"mime".into()).unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_encode_invalid_buffer() {
        let img = JsRaster::new(4, 4, vec![0u8; 3]);
        assert!(encode_image(&img, "image/png", 1.0, "").is_err());
    }
}
