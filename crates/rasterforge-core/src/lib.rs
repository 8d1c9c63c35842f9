//! RasterForge Core - image transform and composite pipeline
//!
//! This crate provides the pixel pipeline behind RasterForge: crop, resize,
//! rotate/flip, color filters, sharpen, watermarks and re-encoding, plus the
//! sequential batch protocol used by the WASM worker.
//!
//! # Pipeline
//!
//! 1. Decode (EXIF orientation applied)
//! 2. Geometry planning (crop, resize plan, canvas size)
//! 3. Composite (filters, rotation and flips about the canvas center)
//! 4. Sharpen
//! 5. Image watermark, then text watermark
//! 6. Encode, retrying once as PNG

pub mod batch;
pub mod codec;
pub mod color;
pub mod compositor;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod fonts;
pub mod geometry;
pub mod luminance;
pub mod options;
pub mod pipeline;
pub mod sharpen;
pub mod transform;
pub mod watermark;

pub use batch::{output_name, run_batch, BatchEvent, BatchItem, BatchOutcome, CancelToken};
pub use codec::{encode_with_fallback, Encoded, ImageCodec, RasterCodec};
pub use decode::{DecodeError, Raster};
pub use encode::{EncodeError, OutputFormat};
pub use filters::{filter_chain, FilterOp};
pub use fonts::{FontError, FontSlot};
pub use geometry::{GeometryPlan, Rect, ResizePlan};
pub use options::{Anchor, RenderPlan};
pub use pipeline::{RenderError, Renderer};
