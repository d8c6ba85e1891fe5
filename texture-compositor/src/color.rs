//! Base colour values as the host page sends them.
use image::Rgba;
use serde::{Deserialize, Serialize};

/// Canvas default fill, used when a colour string cannot be rendered.
pub const CANVAS_DEFAULT_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Opaque colour string (usually a hex string from the catalog).
///
/// Never validated up front. Unrenderable values fall back to the canvas
/// default fill when drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorValue(pub String);

impl ColorValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into RGBA, `None` when the value is not a colour we can draw.
    pub fn parse(&self) -> Option<Rgba<u8>> {
        let value = self.0.trim();
        match value.to_ascii_lowercase().as_str() {
            "white" => return Some(Rgba([255, 255, 255, 255])),
            "black" => return Some(Rgba([0, 0, 0, 255])),
            "transparent" => return Some(Rgba([0, 0, 0, 0])),
            _ => {}
        }

        let hex = value.strip_prefix('#').unwrap_or(value);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let digits: Vec<u8> = hex
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();

        match digits.len() {
            3 => Some(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
            4 => Some(Rgba([
                digits[0] * 17,
                digits[1] * 17,
                digits[2] * 17,
                digits[3] * 17,
            ])),
            6 => Some(Rgba([
                digits[0] << 4 | digits[1],
                digits[2] << 4 | digits[3],
                digits[4] << 4 | digits[5],
                255,
            ])),
            8 => Some(Rgba([
                digits[0] << 4 | digits[1],
                digits[2] << 4 | digits[3],
                digits[4] << 4 | digits[5],
                digits[6] << 4 | digits[7],
            ])),
            _ => None,
        }
    }

    /// Colour to fill with. Invalid values degrade to the canvas default.
    pub fn to_fill(&self) -> Rgba<u8> {
        self.parse().unwrap_or_else(|| {
            log::warn!(
                "Base colour '{}' is not renderable, using default fill",
                self.0
            );
            CANVAS_DEFAULT_FILL
        })
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self(constants::texture::DEFAULT_BASE_COLOR.to_string())
    }
}

impl From<&str> for ColorValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(ColorValue::from("#f5f5f5").parse(), Some(Rgba([245, 245, 245, 255])));
        assert_eq!(ColorValue::from("F00").parse(), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(ColorValue::from("#0000ff80").parse(), Some(Rgba([0, 0, 255, 128])));
        assert_eq!(ColorValue::from("#fff8").parse(), Some(Rgba([255, 255, 255, 136])));
        assert_eq!(ColorValue::from(" White ").parse(), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn invalid_values_degrade_to_default_fill() {
        for bad in ["", "#12", "#ggg", "navy-ish", "#1234567"] {
            assert_eq!(ColorValue::from(bad).parse(), None, "{bad}");
            assert_eq!(ColorValue::from(bad).to_fill(), CANVAS_DEFAULT_FILL);
        }
    }
}
