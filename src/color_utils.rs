//! Color parsing shared by config validation and the raster renderer
use palette::rgb::FromHexError;
use palette::Srgb;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorParseError {
    #[error("expected `#` followed by 6 hex digits")]
    Format,
    #[error(transparent)]
    Hex(#[from] FromHexError),
}

/// Parse a `#RRGGBB` string.
///
/// Shorthand (`#RGB`), alpha (`#RRGGBBAA`) and named colors are rejected so
/// the raster and vector outputs always agree on what a color means.
pub fn parse_hex_color(color_str: &str) -> Result<Srgb<u8>, ColorParseError> {
    let hex = color_str.strip_prefix('#').ok_or(ColorParseError::Format)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::Format);
    }
    Ok(Srgb::<u8>::from_str(hex)?)
}

/// Convert a parsed color into an opaque tiny-skia color.
pub fn to_skia_color(color: Srgb<u8>) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.red, color.green, color.blue, 255)
}

/// Parse and convert in one step, for renderers working from a validated config.
pub fn skia_color(color_str: &str) -> Result<tiny_skia::Color, ColorParseError> {
    parse_hex_color(color_str).map(to_skia_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = parse_hex_color("#8B5CF6").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0x8b, 0x5c, 0xf6));
        let c = parse_hex_color("#ec4899").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0xec, 0x48, 0x99));
    }

    #[test]
    fn rejects_other_forms() {
        for bad in ["8B5CF6", "#fff", "#8B5CF6FF", "#GGGGGG", "", "transparent", "#ÿÿÿ"] {
            assert!(parse_hex_color(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
