//! 24 bit RGB colors used to tell targets apart
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque 24 bit RGB color stored as 0xRRGGBB
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(u32);

/// Colors handed out to targets in the order they appear in a message
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color(0x00a000),
    Color(0x0000e0),
    Color(0xc00000),
    Color(0xc0c000),
    Color(0xc000c0),
    Color(0xff8000),
    Color(0x0000a0),
    Color(0xa0a0a0),
];

impl Color {
    pub fn new(rgb: u32) -> Self {
        Color(rgb & 0xff_ffff)
    }

    pub fn rgb(self) -> u32 {
        self.0
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Return the color as an ARGB value with the given alpha
    pub fn with_alpha(self, alpha: u8) -> u32 {
        (alpha as u32) << 24 | self.0
    }
}

/// Color for the target at `index`, cycling through the palette when it runs out
pub fn palette_color(palette: &[Color], index: usize) -> Color {
    if palette.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
    } else {
        palette[index % palette.len()]
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(Error::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| Error::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let buf = String::deserialize(deserializer)?;
        Color::from_str(&buf).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
