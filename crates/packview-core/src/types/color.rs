use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque RGB display color, stored as `0xRRGGBB`.
///
/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #rrggbb or 0xrrggbb")]
pub struct ColorParseError(String);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);
    pub const RED: Color = Color(0xff0000);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Multiply every channel by `factor`, saturating at white.
    pub fn scaled(self, factor: f32) -> Self {
        let channel = |c: u8| ((c as f32 * factor).round().clamp(0.0, 255.0)) as u32;
        Self((channel(self.r()) << 16) | (channel(self.g()) << 8) | channel(self.b()))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_hex(0x509ed8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
