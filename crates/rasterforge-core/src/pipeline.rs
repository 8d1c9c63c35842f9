//! The single-image render pipeline.
//!
//! ```text
//! decode → plan geometry → composite (filters, rotate, flip) → sharpen
//!        → image watermark → text watermark → encode (with PNG fallback)
//! ```
//!
//! Stages run strictly in order on an owned raster. A [`Renderer`] keeps no
//! per-render state, so one renderer can serve any number of renders.

use thiserror::Error;

use crate::codec::{encode_with_fallback, Encoded, ImageCodec, RasterCodec};
use crate::compositor::composite;
use crate::decode::{DecodeError, Raster};
use crate::encode::{EncodeError, OutputFormat};
use crate::fonts::{FontError, FontSlot};
use crate::geometry;
use crate::options::RenderPlan;
use crate::sharpen::sharpen;
use crate::watermark::apply_watermarks;

/// Errors that end a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode output image: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Font(#[from] FontError),
}

/// Runs the pipeline against a codec and an optional watermark font.
#[derive(Debug, Default)]
pub struct Renderer<C = ImageCodec> {
    codec: C,
    font: FontSlot,
}

impl Renderer<ImageCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: RasterCodec> Renderer<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            font: FontSlot::empty(),
        }
    }

    /// Use `font` for text watermarks.
    pub fn with_font(mut self, font: FontSlot) -> Self {
        self.font = font;
        self
    }

    /// Render encoded `bytes` and encode the result.
    ///
    /// `mime` is the source type hint; an empty string means unknown.
    pub fn render(
        &self,
        bytes: &[u8],
        mime: &str,
        plan: &RenderPlan,
    ) -> Result<Encoded, RenderError> {
        let plan = plan.normalized();
        let hint = Some(mime.trim()).filter(|m| !m.is_empty());

        let source = self.codec.decode(bytes, hint)?;
        tracing::debug!(
            width = source.width,
            height = source.height,
            "Decoded source image"
        );

        let raster = self.run_stages(source, &plan)?;
        let encoded = encode_with_fallback(&self.codec, &raster, &plan.output)?;
        tracing::debug!(
            mime = encoded.mime,
            bytes = encoded.bytes.len(),
            "Encoded output image"
        );
        Ok(encoded)
    }

    /// Run the pixel stages only, returning the final raster.
    pub fn render_raster(&self, source: Raster, plan: &RenderPlan) -> Result<Raster, RenderError> {
        self.run_stages(source, &plan.normalized())
    }

    fn run_stages(&self, source: Raster, plan: &RenderPlan) -> Result<Raster, RenderError> {
        let geometry = geometry::plan(source.width, source.height, plan);
        tracing::debug!(
            canvas_width = geometry.canvas_width,
            canvas_height = geometry.canvas_height,
            resize_width = geometry.resize.w,
            resize_height = geometry.resize.h,
            "Planned geometry"
        );

        let opaque = OutputFormat::from_mime(&plan.output.mime_type).is_opaque();
        let mut canvas = composite(&source, &geometry, plan, opaque);
        drop(source);

        if plan.sharpen.strength > 0.0 {
            tracing::debug!(strength = plan.sharpen.strength, "Sharpening");
            sharpen(&mut canvas, plan.sharpen.strength);
        }

        let watermark = self.decode_watermark(plan);
        let font = match &plan.watermark_text {
            Some(spec) if !spec.text.trim().is_empty() && spec.opacity > 0.0 => self.font.get()?,
            _ => None,
        };
        apply_watermarks(&mut canvas, plan, watermark.as_ref(), font);

        Ok(canvas)
    }

    /// Decode the secondary raster. A watermark that fails to decode is skipped.
    fn decode_watermark(&self, plan: &RenderPlan) -> Option<Raster> {
        let spec = plan.watermark_image.as_ref()?;
        if spec.raster.is_empty() || spec.opacity <= 0.0 {
            return None;
        }
        match self.codec.decode(&spec.raster, None) {
            Ok(raster) => Some(raster),
            Err(e) => {
                tracing::warn!(error = %e, "Watermark image could not be decoded, skipping");
                None
            }
        }
    }
}
