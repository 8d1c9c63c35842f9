//! Pipeline bindings: the single-item render call.
//!
//! # Example
//!
//! ```typescript
//! import { JsRenderer } from '@rasterforge/wasm';
//!
//! const fontBytes = new Uint8Array(await (await fetch('/fonts/Inter.ttf')).arrayBuffer());
//! const renderer = new JsRenderer(fontBytes);
//!
//! const out = renderer.render(bytes, file.type, {
//!   resize: { enabled: true, mode: 'cover', width: 400, height: 400 },
//!   watermarkText: { text: '© me', position: 'br' },
//!   output: { type: 'image/jpeg', quality: 0.85 },
//! }, null);
//! ```

use crate::types::{JsEncoded, JsRaster};
use rasterforge_core::{FontSlot, RenderPlan, Renderer};
use wasm_bindgen::prelude::*;

/// A renderer that keeps its parsed font between calls.
#[wasm_bindgen]
pub struct JsRenderer {
    inner: Renderer,
}

#[wasm_bindgen]
impl JsRenderer {
    /// Create a renderer. `font` is TTF/OTF bytes for text watermarks;
    /// without it text watermarks are skipped.
    #[wasm_bindgen(constructor)]
    pub fn new(font: Option<Vec<u8>>) -> JsRenderer {
        let slot = font
            .filter(|bytes| !bytes.is_empty())
            .map(FontSlot::from_bytes)
            .unwrap_or_default();
        JsRenderer {
            inner: Renderer::new().with_font(slot),
        }
    }

    /// Render encoded `bytes` with `options` and encode the result.
    ///
    /// `watermark` overrides `options.watermarkImage.raster` so image bytes
    /// need not go through the options object.
    pub fn render(
        &self,
        bytes: &[u8],
        mime: &str,
        options: JsValue,
        watermark: Option<Vec<u8>>,
    ) -> Result<JsEncoded, JsValue> {
        let plan = parse_plan(options, watermark)?;
        self.inner
            .render(bytes, mime, &plan)
            .map(JsEncoded::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run the pixel stages on an already decoded raster (for previews).
    pub fn render_raster(
        &self,
        image: &JsRaster,
        options: JsValue,
        watermark: Option<Vec<u8>>,
    ) -> Result<JsRaster, JsValue> {
        let plan = parse_plan(options, watermark)?;
        let raster = image.to_raster()?;
        self.inner
            .render_raster(raster, &plan)
            .map(JsRaster::from_raster)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsRenderer {
    pub(crate) fn inner(&self) -> &Renderer {
        &self.inner
    }
}

/// Deserialize the option tree. `undefined` and `null` mean all defaults.
pub(crate) fn parse_plan(
    options: JsValue,
    watermark: Option<Vec<u8>>,
) -> Result<RenderPlan, JsValue> {
    let plan = if options.is_undefined() || options.is_null() {
        RenderPlan::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid render options: {e}")))?
    };
    Ok(with_watermark_bytes(plan, watermark))
}

fn with_watermark_bytes(mut plan: RenderPlan, watermark: Option<Vec<u8>>) -> RenderPlan {
    if let Some(bytes) = watermark.filter(|b| !b.is_empty()) {
        plan.watermark_image.get_or_insert_with(Default::default).raster = bytes;
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watermark_bytes_create_spec() {
        let plan = with_watermark_bytes(RenderPlan::default(), Some(vec![1, 2, 3]));
        let spec = plan.watermark_image.unwrap();
        assert_eq!(spec.raster, vec![1, 2, 3]);
        assert_eq!(spec.opacity, 0.5);
    }

    #[test]
    fn test_watermark_bytes_keep_existing_settings() {
        let mut plan = RenderPlan::default();
        plan.watermark_image = Some(rasterforge_core::options::WatermarkImageSpec {
            opacity: 0.9,
            ..Default::default()
        });
        let plan = with_watermark_bytes(plan, Some(vec![7]));
        let spec = plan.watermark_image.unwrap();
        assert_eq!(spec.opacity, 0.9);
        assert_eq!(spec.raster, vec![7]);
    }

    #[test]
    fn test_empty_watermark_bytes_ignored() {
        let plan = with_watermark_bytes(RenderPlan::default(), Some(vec![]));
        assert!(plan.watermark_image.is_none());
    }
}
