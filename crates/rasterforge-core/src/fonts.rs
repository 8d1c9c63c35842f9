//! Font supply for the text watermark.
//!
//! Fonts are provided by the caller as raw TTF/OTF bytes. A [`FontSlot`] parses
//! them on first use and reuses the parsed face for every later render. Each
//! renderer owns its own slot; there is no process-wide font state.

use std::fmt;
use std::sync::OnceLock;

use ab_glyph::FontArc;
use thiserror::Error;

/// Errors from loading a caller-supplied font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Invalid font data: {0}")]
    Invalid(String),
}

/// Lazily parsed font.
#[derive(Default)]
pub struct FontSlot {
    source: Option<Vec<u8>>,
    font: OnceLock<FontArc>,
}

impl fmt::Debug for FontSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSlot")
            .field("source_len", &self.source.as_ref().map(Vec::len))
            .field("parsed", &self.font.get().is_some())
            .finish()
    }
}

impl FontSlot {
    /// A slot with no font. Text watermarks are skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot that parses `bytes` the first time the font is needed.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            source: Some(bytes),
            font: OnceLock::new(),
        }
    }

    /// A slot holding an already parsed font.
    pub fn with_font(font: FontArc) -> Self {
        let slot = Self::default();
        let _ = slot.font.set(font);
        slot
    }

    /// True if a font was supplied, parsed or not.
    pub fn is_configured(&self) -> bool {
        self.source.is_some() || self.font.get().is_some()
    }

    /// The font, parsing it on first call.
    ///
    /// Returns `Ok(None)` when no font was supplied.
    pub fn get(&self) -> Result<Option<&FontArc>, FontError> {
        if let Some(font) = self.font.get() {
            return Ok(Some(font));
        }
        let Some(bytes) = &self.source else {
            return Ok(None);
        };

        let parsed =
            FontArc::try_from_vec(bytes.clone()).map_err(|e| FontError::Invalid(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), "Parsed watermark font");
        Ok(Some(self.font.get_or_init(|| parsed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../testdata/DejaVuSans.ttf");

    #[test]
    fn test_empty_slot_has_no_font() {
        let slot = FontSlot::empty();
        assert!(!slot.is_configured());
        assert!(slot.get().unwrap().is_none());
    }

    #[test]
    fn test_font_is_parsed_once_and_reused() {
        let slot = FontSlot::from_bytes(DEJAVU.to_vec());
        assert!(slot.is_configured());
        let first = slot.get().unwrap().unwrap() as *const FontArc;
        let second = slot.get().unwrap().unwrap() as *const FontArc;
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_bytes_error() {
        let slot = FontSlot::from_bytes(vec![1, 2, 3, 4]);
        assert!(matches!(slot.get(), Err(FontError::Invalid(_))));
    }

    #[test]
    fn test_with_font_is_ready() {
        let font = FontArc::try_from_slice(DEJAVU).unwrap();
        let slot = FontSlot::with_font(font);
        assert!(slot.is_configured());
        assert!(slot.get().unwrap().is_some());
    }
}
