//! Canonical `#rrggbb` color values.
//!
//! Every public entry and exit point of the filter engine speaks this
//! representation; linear and LMS values only exist inside the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::color::clamp01;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwatchParseError {
    #[error("expected 6 hex digits, got {0} characters")]
    Length(usize),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Swatch {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (any case). Shorthand `#rgb` is rejected.
    pub fn parse(hex: &str) -> Result<Self, SwatchParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(SwatchParseError::Length(digits.len()));
        }
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(SwatchParseError::Digit(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| SwatchParseError::Digit(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Build from normalized 0-1 channels, clamping and rounding each one
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let q = |v: f64| (clamp01(v) * 255.0).round() as u8;
        Self::new(q(r), q(g), q(b))
    }

    /// Build from 0-255 float channels, clamping and rounding each one
    pub fn from_f64_255(r: f64, g: f64, b: f64) -> Self {
        let q = |v: f64| if v.is_nan() { 0 } else { v.round().clamp(0.0, 255.0) as u8 };
        Self::new(q(r), q(g), q(b))
    }

    /// Normalized 0-1 channels
    pub fn to_unit(self) -> [f64; 3] {
        [self.r as f64 / 255.0, self.g as f64 / 255.0, self.b as f64 / 255.0]
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Swatch {
    type Err = SwatchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Swatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Swatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Swatch::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(Swatch::parse("#ff8000").unwrap(), Swatch::new(255, 128, 0));
        assert_eq!(Swatch::parse("FF8000").unwrap(), Swatch::new(255, 128, 0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Swatch::parse("#fff"), Err(SwatchParseError::Length(3)));
        assert_eq!(Swatch::parse(""), Err(SwatchParseError::Length(0)));
        assert!(matches!(Swatch::parse("#gg0000"), Err(SwatchParseError::Digit(_))));
        assert!(matches!(Swatch::parse("#+1+1+1"), Err(SwatchParseError::Digit(_))));
        // multi-byte characters must not panic on slicing
        assert!(Swatch::parse("#ééé").is_err());
    }

    #[test]
    fn test_display_is_lowercase_padded() {
        assert_eq!(Swatch::new(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn test_from_unit_clamps() {
        assert_eq!(Swatch::from_unit(-0.2, 0.5, 1.7), Swatch::new(0, 128, 255));
        assert_eq!(Swatch::from_unit(f64::NAN, 0.0, 0.0), Swatch::new(0, 0, 0));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Swatch::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Swatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Swatch::new(1, 2, 3));
        assert!(serde_json::from_str::<Swatch>("\"#01\"").is_err());
    }
}
