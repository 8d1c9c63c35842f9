//! Render options.
//!
//! A [`RenderPlan`] is the full, declarative description of one render. It is
//! deserialized from the option tree callers send (camelCase keys, every key
//! optional) and normalized once with [`RenderPlan::normalized`]. Stages only
//! ever read it.
//!
//! Options are permissive: numbers are clamped to their documented ranges,
//! values of the wrong JSON type and unknown enumeration values fall back to
//! defaults, and unparsable colors fall back to white. Nothing in here returns
//! an error for a well-formed option object.

mod lenient;

use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::parse_color_or;

/// Pixel-space crop rectangle in source coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSpec {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub x: f64,
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub y: f64,
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub w: f64,
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub h: f64,
}

/// How the resize target is fitted to the cropped source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Fit inside the target, preserving aspect ratio.
    #[default]
    Contain,
    /// Fill the target exactly, center-cropping the source.
    Cover,
    /// Stretch to the target, ignoring aspect ratio.
    Exact,
}

impl From<String> for ResizeMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "cover" => ResizeMode::Cover,
            "exact" => ResizeMode::Exact,
            _ => ResizeMode::Contain,
        }
    }
}

impl<'de> Deserialize<'de> for ResizeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::text(deserializer)?.map(Self::from).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSpec {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub enabled: bool,
    pub mode: ResizeMode,
    /// Target width; when absent the cropped source width is used.
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub width: Option<f64>,
    /// Target height; when absent the cropped source height is used.
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateSpec {
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub degrees: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipSpec {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub h: bool,
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub v: bool,
}

/// Rotation and reflection applied while drawing onto the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformSpec {
    pub rotate_degrees: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

/// Color filter parameters. Absent values are the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// 0 to 1
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub grayscale: f32,
    /// Blur radius in pixels, 0 to 30
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub blur: f32,
    /// Percent, 0 to 300
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub brightness: f32,
    /// Percent, 0 to 300
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub contrast: f32,
    /// Percent, 0 to 300
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub saturation: f32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            grayscale: 0.0,
            blur: 0.0,
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

impl FilterSpec {
    /// Clamp every parameter to its range. Non-finite values become the identity.
    pub fn clamped(&self) -> Self {
        let identity = Self::default();
        Self {
            grayscale: clamp_or(self.grayscale, 0.0, 1.0, identity.grayscale),
            blur: clamp_or(self.blur, 0.0, 30.0, identity.blur),
            brightness: clamp_or(self.brightness, 0.0, 300.0, identity.brightness),
            contrast: clamp_or(self.contrast, 0.0, 300.0, identity.contrast),
            saturation: clamp_or(self.saturation, 0.0, 300.0, identity.saturation),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenSpec {
    /// 0 (off) to 3
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub strength: f32,
}

/// Where a watermark is anchored on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Anchor {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[default]
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "center")]
    Center,
}

impl From<String> for Anchor {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tl" => Anchor::TopLeft,
            "tr" => Anchor::TopRight,
            "bl" => Anchor::BottomLeft,
            "center" | "c" => Anchor::Center,
            _ => Anchor::BottomRight,
        }
    }
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(lenient::text(deserializer)?.map(Self::from).unwrap_or_default())
    }
}

/// A secondary image overlaid on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkImageSpec {
    /// Encoded image bytes (PNG, JPEG or WebP).
    #[serde(deserialize_with = "lenient::bytes_or_empty")]
    pub raster: Vec<u8>,
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub opacity: f32,
    /// Watermark width as a fraction of the canvas width, 0.05 to 1.
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub scale: f32,
    pub position: Anchor,
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub padding: f32,
}

impl Default for WatermarkImageSpec {
    fn default() -> Self {
        Self {
            raster: Vec::new(),
            opacity: 0.5,
            scale: 0.2,
            position: Anchor::default(),
            padding: 16.0,
        }
    }
}

/// A text label overlaid on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkTextSpec {
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub text: String,
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub opacity: f32,
    /// Font size in pixels, 8 to 240.
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub size: f32,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub color: String,
    pub position: Anchor,
    /// Rotation of the label about its own center, in degrees.
    #[serde(deserialize_with = "lenient::f64_or_nan")]
    pub rotate: f64,
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub padding: f32,
}

impl Default for WatermarkTextSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            opacity: 0.5,
            size: 32.0,
            color: "#ffffff".to_string(),
            position: Anchor::default(),
            rotate: 0.0,
            padding: 16.0,
        }
    }
}

impl WatermarkTextSpec {
    pub fn rgba(&self) -> Rgba<u8> {
        parse_color_or(&self.color, Rgba([255, 255, 255, 255]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSpec {
    #[serde(rename = "type", deserialize_with = "lenient::string_or_empty")]
    pub mime_type: String,
    /// Lossy quality, 0.05 to 1.
    #[serde(deserialize_with = "lenient::f32_or_nan")]
    pub quality: f32,
    /// Fill color for formats without an alpha channel.
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub jpeg_background: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            mime_type: "image/png".to_string(),
            quality: 0.85,
            jpeg_background: "#ffffff".to_string(),
        }
    }
}

impl OutputSpec {
    pub fn background(&self) -> Rgba<u8> {
        parse_color_or(&self.jpeg_background, Rgba([255, 255, 255, 255]))
    }
}

/// Every option for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderPlan {
    pub crop: CropSpec,
    pub resize: ResizeSpec,
    pub rotate: RotateSpec,
    pub flip: FlipSpec,
    pub filters: FilterSpec,
    pub sharpen: SharpenSpec,
    pub watermark_image: Option<WatermarkImageSpec>,
    pub watermark_text: Option<WatermarkTextSpec>,
    pub output: OutputSpec,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> TransformSpec {
        TransformSpec {
            rotate_degrees: self.rotate.degrees,
            flip_h: self.flip.h,
            flip_v: self.flip.v,
        }
    }

    /// Clamp every numeric option into its documented range.
    ///
    /// Crop bounds depend on the source size, so the geometry planner clamps
    /// them; here non-finite crop values only fall back to zero.
    pub fn normalized(&self) -> Self {
        let mut plan = self.clone();

        for v in [
            &mut plan.crop.x,
            &mut plan.crop.y,
            &mut plan.crop.w,
            &mut plan.crop.h,
        ] {
            if !v.is_finite() {
                *v = 0.0;
            }
        }

        plan.resize.width = plan.resize.width.filter(|w| w.is_finite() && *w >= 1.0);
        plan.resize.height = plan.resize.height.filter(|h| h.is_finite() && *h >= 1.0);
        if !plan.rotate.degrees.is_finite() {
            plan.rotate.degrees = 0.0;
        }
        plan.filters = plan.filters.clamped();
        plan.sharpen.strength = clamp_or(plan.sharpen.strength, 0.0, 3.0, 0.0);

        if let Some(wm) = plan.watermark_image.as_mut() {
            wm.opacity = clamp_or(wm.opacity, 0.0, 1.0, 0.5);
            wm.scale = clamp_or(wm.scale, 0.05, 1.0, 0.2);
            wm.padding = clamp_or(wm.padding, 0.0, 80.0, 16.0);
        }
        if let Some(wm) = plan.watermark_text.as_mut() {
            wm.opacity = clamp_or(wm.opacity, 0.0, 1.0, 0.5);
            wm.size = clamp_or(wm.size, 8.0, 240.0, 32.0);
            wm.padding = clamp_or(wm.padding, 0.0, 80.0, 16.0);
            if !wm.rotate.is_finite() {
                wm.rotate = 0.0;
            }
        }

        plan.output.quality = clamp_or(plan.output.quality, 0.05, 1.0, 0.85);
        plan
    }
}

#[inline]
fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
