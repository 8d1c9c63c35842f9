//! Batch protocol bindings for the worker surface.
//!
//! Items are `{name, sourceBytes, sourceMime, options}` objects. Each event is
//! passed to the callback as a plain object tagged by `type`:
//!
//! ```typescript
//! render_batch(renderer, [
//!   {
//!     name: 'a.png',
//!     sourceMime: 'image/png',
//!     sourceBytes: aBytes,
//!     options: { output: { type: 'image/jpeg' } },
//!   },
//!   { name: 'b.png', sourceMime: 'image/png', sourceBytes: bBytes },
//! ], (event) => {
//!   switch (event.type) {
//!     case 'item': save(event.name, event.encodedBytes, event.outputMime); break;
//!     case 'progress': bar.value = event.value; break;
//!     case 'done': case 'error': case 'cancelled': finish(event); break;
//!   }
//! });
//! ```

use crate::render::{parse_plan, JsRenderer};
use js_sys::{Array, Function, Object, Reflect, Uint8Array};
use rasterforge_core::{run_batch, BatchEvent, BatchItem, BatchOutcome, CancelToken};
use wasm_bindgen::prelude::*;

/// Render `items` in order, reporting events through `callback`.
///
/// Returning `false` from the callback cancels the batch at the next item
/// boundary. Returns `true` when every item rendered. Malformed items reject
/// before any rendering starts.
#[wasm_bindgen]
pub fn render_batch(
    renderer: &JsRenderer,
    items: Array,
    callback: &Function,
) -> Result<bool, JsValue> {
    let items = items
        .iter()
        .enumerate()
        .map(|(index, value)| batch_item(index, value))
        .collect::<Result<Vec<_>, _>>()?;
    let cancel = CancelToken::new();

    let mut callback_error = None;
    let outcome = run_batch(renderer.inner(), &items, &cancel, |event| {
        if let BatchEvent::Error { index, message } = &event {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "Batch item {index} failed: {message}"
            )));
        }
        match event_to_js(event).and_then(|obj| callback.call1(&JsValue::NULL, &obj)) {
            Ok(ret) if ret.as_bool() == Some(false) => cancel.cancel(),
            Ok(_) => {}
            Err(e) => {
                // Stop at the next item boundary and report the first callback error
                cancel.cancel();
                if callback_error.is_none() {
                    callback_error = Some(e);
                }
            }
        }
    });

    if let Some(e) = callback_error {
        return Err(e);
    }
    Ok(outcome == BatchOutcome::Completed)
}

fn batch_item(index: usize, value: JsValue) -> Result<BatchItem, JsValue> {
    let field = |key: &str| Reflect::get(&value, &JsValue::from_str(key));

    let name = field("name")?.as_string().unwrap_or_else(|| format!("image-{index}"));
    let source_mime = field("sourceMime")?.as_string().unwrap_or_default();
    let source_bytes = field("sourceBytes")?;
    if !source_bytes.is_instance_of::<Uint8Array>() {
        return Err(JsValue::from_str(&format!(
            "Batch item {index}: `sourceBytes` must be a Uint8Array"
        )));
    }
    let source_bytes = Uint8Array::new(&source_bytes).to_vec();
    let watermark = field("watermark")?
        .dyn_into::<Uint8Array>()
        .ok()
        .map(|b| b.to_vec());
    let options = parse_plan(field("options")?, watermark)?;

    Ok(BatchItem {
        name,
        source_bytes,
        source_mime,
        options,
    })
}

/// Convert an event to a JS object, passing encoded bytes as a Uint8Array.
fn event_to_js(event: BatchEvent) -> Result<JsValue, JsValue> {
    match event {
        BatchEvent::Item {
            index,
            name,
            encoded_bytes,
            output_mime,
        } => {
            let obj = Object::new();
            let encoded = Uint8Array::from(encoded_bytes.as_slice());
            Reflect::set(&obj, &"type".into(), &"item".into())?;
            Reflect::set(&obj, &"index".into(), &JsValue::from(index as u32))?;
            Reflect::set(&obj, &"name".into(), &name.into())?;
            Reflect::set(&obj, &"encodedBytes".into(), &encoded)?;
            Reflect::set(&obj, &"outputMime".into(), &output_mime.into())?;
            Ok(obj.into())
        }
        other => {
            serde_wasm_bindgen::to_value(&other).map_err(|e| JsValue::from_str(&e.to_string()))
        }
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn event_type(event: &JsValue) -> String {
        Reflect::get(event, &"type".into())
            .unwrap()
            .as_string()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_progress_event_shape() {
        let js = event_to_js(BatchEvent::Progress { value: 0.5 }).unwrap();
        assert_eq!(event_type(&js), "progress");
        let value = Reflect::get(&js, &"value".into()).unwrap().as_f64();
        assert_eq!(value, Some(0.5));
    }

    #[wasm_bindgen_test]
    fn test_item_event_carries_uint8array() {
        let js = event_to_js(BatchEvent::Item {
            index: 0,
            name: "a.png".to_string(),
            encoded_bytes: vec![1, 2, 3],
            output_mime: "image/png".to_string(),
        })
        .unwrap();
        assert_eq!(event_type(&js), "item");
        let bytes = Reflect::get(&js, &"encodedBytes".into()).unwrap();
        assert!(bytes.is_instance_of::<Uint8Array>());
        let mime = Reflect::get(&js, &"outputMime".into()).unwrap().as_string();
        assert_eq!(mime.as_deref(), Some("image/png"));
        assert!(Reflect::get(&js, &"bytes".into()).unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_item_reads_source_fields() {
        let obj = Object::new();
        let bytes = Uint8Array::from(&[1u8, 2, 3][..]);
        Reflect::set(&obj, &"name".into(), &"x.png".into()).unwrap();
        Reflect::set(&obj, &"sourceBytes".into(), &bytes).unwrap();
        Reflect::set(&obj, &"sourceMime".into(), &"image/png".into()).unwrap();
        let item = batch_item(0, obj.into()).unwrap();
        assert_eq!(item.source_bytes, vec![1, 2, 3]);
        assert_eq!(item.source_mime, "image/png");
    }

    #[wasm_bindgen_test]
    fn test_item_without_bytes_is_rejected() {
        let obj = Object::new();
        Reflect::set(&obj, &"name".into(), &"x.png".into()).unwrap();
        assert!(batch_item(0, obj.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_empty_batch_reports_done() {
        let renderer = JsRenderer::new(None);
        let events = Array::new();
        let sink = events.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
            sink.push(&e);
        });
        let ok = render_batch(&renderer, Array::new(), closure.as_ref().unchecked_ref()).unwrap();
        assert!(ok);
        assert_eq!(events.length(), 1);
        assert_eq!(event_type(&events.get(0)), "done");
    }
}
