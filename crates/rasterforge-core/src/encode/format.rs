//! Output formats and mime normalization.

use serde::{Deserialize, Serialize};

/// An encodable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, keeps alpha. Also the fallback for unknown mime types.
    #[default]
    Png,
    /// Lossy, no alpha channel.
    Jpeg,
    /// Encoded losslessly, keeps alpha.
    WebP,
}

impl OutputFormat {
    /// Resolve a mime type. Unknown or empty types resolve to PNG.
    pub fn from_mime(mime: &str) -> Self {
        match normalize_mime(mime).as_str() {
            "image/jpeg" => OutputFormat::Jpeg,
            "image/webp" => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
        }
    }

    /// True for formats that cannot store transparency.
    pub fn is_opaque(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

/// Lowercase, trim, drop parameters, and fold common aliases.
///
/// `image/jpg` and `image/pjpeg` become `image/jpeg`.
pub fn normalize_mime(mime: &str) -> String {
    let base = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match base.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        "image/x-png" => "image/png".to_string(),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_known() {
        assert_eq!(OutputFormat::from_mime("image/png"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_mime("image/jpeg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_mime("image/webp"), OutputFormat::WebP);
    }

    #[test]
    fn test_from_mime_aliases() {
        assert_eq!(OutputFormat::from_mime("image/jpg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_mime(" IMAGE/PJPEG "), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_mime("image/webp; q=1"), OutputFormat::WebP);
    }

    #[test]
    fn test_unknown_mime_falls_back_to_png() {
        assert_eq!(OutputFormat::from_mime("image/tiff"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_mime(""), OutputFormat::Png);
        assert_eq!(OutputFormat::from_mime("text/html"), OutputFormat::Png);
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(OutputFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert!(OutputFormat::Jpeg.is_opaque());
        assert!(!OutputFormat::Png.is_opaque());
        assert!(!OutputFormat::WebP.is_opaque());
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("Image/JPG"), "image/jpeg");
        assert_eq!(normalize_mime("image/png;charset=x"), "image/png");
        assert_eq!(normalize_mime("image/x-png"), "image/png");
    }
}
