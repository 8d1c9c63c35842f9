//! Sequential batch protocol.
//!
//! Items are rendered in input order. For each item the callback receives an
//! [`BatchEvent::Item`] followed by a [`BatchEvent::Progress`]; after the last
//! item it receives [`BatchEvent::Done`]. The first failure emits
//! [`BatchEvent::Error`] and stops the batch.
//!
//! Cancellation is checked between items only. A render that has started
//! always finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::RasterCodec;
use crate::encode::OutputFormat;
use crate::options::RenderPlan;
use crate::pipeline::Renderer;

/// One source image and the options to render it with.
///
/// Serialized as `{name, sourceBytes, sourceMime, options}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchItem {
    pub name: String,
    pub source_bytes: Vec<u8>,
    pub source_mime: String,
    pub options: RenderPlan,
}

/// Events reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BatchEvent {
    /// An item rendered successfully.
    #[serde(rename_all = "camelCase")]
    Item {
        index: usize,
        name: String,
        encoded_bytes: Vec<u8>,
        output_mime: String,
    },
    /// Completed items over total, 0 to 1.
    Progress { value: f64 },
    /// Every item rendered.
    Done,
    /// An item failed; no further items are rendered.
    Error { index: usize, message: String },
    /// Stopped at an item boundary after a cancel request.
    Cancelled { completed: usize },
}

/// Shared flag for requesting cancellation from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed,
    Failed { index: usize },
    Cancelled { completed: usize },
}

/// Render `items` in order, reporting through `emit`.
pub fn run_batch<C, F>(
    renderer: &Renderer<C>,
    items: &[BatchItem],
    cancel: &CancelToken,
    mut emit: F,
) -> BatchOutcome
where
    C: RasterCodec,
    F: FnMut(BatchEvent),
{
    let total = items.len();
    tracing::debug!(total, "Starting batch");

    for (index, item) in items.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::debug!(completed = index, "Batch cancelled");
            emit(BatchEvent::Cancelled { completed: index });
            return BatchOutcome::Cancelled { completed: index };
        }

        match renderer.render(&item.source_bytes, &item.source_mime, &item.options) {
            Ok(encoded) => {
                let format = OutputFormat::from_mime(encoded.mime);
                emit(BatchEvent::Item {
                    index,
                    name: output_name(&item.name, format),
                    encoded_bytes: encoded.bytes,
                    output_mime: encoded.mime.to_string(),
                });
                emit(BatchEvent::Progress {
                    value: (index + 1) as f64 / total as f64,
                });
            }
            Err(e) => {
                tracing::warn!(index, name = %item.name, error = %e, "Batch item failed");
                emit(BatchEvent::Error {
                    index,
                    message: e.to_string(),
                });
                return BatchOutcome::Failed { index };
            }
        }
    }

    emit(BatchEvent::Done);
    BatchOutcome::Completed
}

/// Replace the extension of `name` with the one for `format`.
///
/// Names without an extension get one appended; an empty name becomes `image`.
pub fn output_name(name: &str, format: OutputFormat) -> String {
    let name = name.trim();
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 && !name[dot..].contains(['/', '\\']) => &name[..dot],
        _ => name,
    };
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}.{}", format.extension())
}
