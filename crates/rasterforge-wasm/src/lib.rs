//! Rasterforge WASM - WebAssembly bindings for the render pipeline
//!
//! This crate exposes rasterforge-core to JavaScript/TypeScript, typically
//! from inside a Web Worker.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for rasters and encoded output
//! - `decode` - Image decoding and resize bindings
//! - `encode` - Image encoding bindings with PNG fallback
//! - `render` - The full decode, composite, watermark and encode pipeline
//! - `batch` - Ordered batch rendering with progress events
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsRenderer } from '@rasterforge/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const renderer = new JsRenderer(null);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = renderer.render(bytes, file.type, { rotate: { degrees: 90 } }, null);
//! console.log(`Encoded ${out.byte_length} bytes as ${out.outputMime}`);
//! ```

use wasm_bindgen::prelude::*;

mod batch;
mod decode;
mod encode;
mod render;
mod types;

// Re-export public types
pub use batch::render_batch;
pub use decode::{decode_image, resize};
pub use encode::encode_image;
pub use render::JsRenderer;
pub use types::{JsEncoded, JsRaster};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
