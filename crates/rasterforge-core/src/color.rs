//! CSS-style color parsing for option values.

use image::Rgba;

/// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or one of the keywords
/// `white`, `black`, `transparent`.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "white" => return Some(Rgba([255, 255, 255, 255])),
        "black" => return Some(Rgba([0, 0, 0, 255])),
        "transparent" => return Some(Rgba([0, 0, 0, 0])),
        _ => {}
    }

    let hex = value.strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

/// [`parse_color`] with a fallback for unparsable input.
pub fn parse_color_or(value: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    parse_color(value).unwrap_or(fallback)
}
