/// Fixed preset filters
///
/// The OS-style presets are channel-mixing matrices on 8-bit sRGB, the
/// baseline condition the adaptive filter is compared against. The hue
/// rotation filter is the degenerate one-knob alternative to the adaptive
/// model: a single global hue offset derived from user-picked primaries.

use serde::{Deserialize, Serialize};

use crate::calibration::DetectedType;
use crate::color::{hsl_to_rgb, rgb_to_hsl, wrap_hue};
use crate::swatch::Swatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsPreset {
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Grayscale,
}

// Rows produce R, G, B from 0-255 input channels
const PROTANOPIA: [[f64; 3]; 3] = [[0.567, 0.433, 0.0], [0.558, 0.442, 0.0], [0.0, 0.242, 0.758]];
const DEUTERANOPIA: [[f64; 3]; 3] = [[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]];
const TRITANOPIA: [[f64; 3]; 3] = [[0.95, 0.05, 0.0], [0.0, 0.433, 0.567], [0.0, 0.475, 0.525]];
// Rec.601 luma
const GRAYSCALE: [[f64; 3]; 3] = [[0.299, 0.587, 0.114], [0.299, 0.587, 0.114], [0.299, 0.587, 0.114]];

impl OsPreset {
    pub const ALL: [OsPreset; 4] = [
        OsPreset::Protanopia,
        OsPreset::Deuteranopia,
        OsPreset::Tritanopia,
        OsPreset::Grayscale,
    ];

    pub fn matrix(self) -> &'static [[f64; 3]; 3] {
        match self {
            OsPreset::Protanopia => &PROTANOPIA,
            OsPreset::Deuteranopia => &DEUTERANOPIA,
            OsPreset::Tritanopia => &TRITANOPIA,
            OsPreset::Grayscale => &GRAYSCALE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OsPreset::Protanopia => "protanopia",
            OsPreset::Deuteranopia => "deuteranopia",
            OsPreset::Tritanopia => "tritanopia",
            OsPreset::Grayscale => "grayscale",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            OsPreset::Protanopia => "Protanopia Preset",
            OsPreset::Deuteranopia => "Deuteranopia Preset",
            OsPreset::Tritanopia => "Tritanopia Preset",
            OsPreset::Grayscale => "Grayscale Preset",
        }
    }

    /// Preset matching a calibration outcome; grayscale when nothing was detected
    pub fn recommended_for(detected: DetectedType) -> OsPreset {
        match detected {
            DetectedType::Protan => OsPreset::Protanopia,
            DetectedType::Deutan => OsPreset::Deuteranopia,
            DetectedType::Tritan => OsPreset::Tritanopia,
            DetectedType::Normal => OsPreset::Grayscale,
        }
    }

    pub fn from_name(name: &str) -> Option<OsPreset> {
        Self::ALL.into_iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn apply_swatch(self, swatch: Swatch) -> Swatch {
        let m = self.matrix();
        let (r, g, b) = (swatch.r as f64, swatch.g as f64, swatch.b as f64);
        let row = |i: usize| m[i][0] * r + m[i][1] * g + m[i][2] * b;
        Swatch::from_f64_255(row(0), row(1), row(2))
    }

    /// Apply to a `#rrggbb` color; unparsable input is returned unchanged
    pub fn apply(self, hex: &str) -> String {
        match Swatch::parse(hex) {
            Ok(swatch) => self.apply_swatch(swatch).to_hex(),
            Err(_) => hex.to_string(),
        }
    }
}

/// User-picked hues for the three primaries, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HueAdjustment {
    pub red_hue: f64,
    pub green_hue: f64,
    pub blue_hue: f64,
}

impl Default for HueAdjustment {
    fn default() -> Self {
        Self { red_hue: 0.0, green_hue: 120.0, blue_hue: 240.0 }
    }
}

impl HueAdjustment {
    /// Mean deviation of the picked primaries from 0/120/240
    pub fn offset(&self) -> f64 {
        ((self.red_hue - 0.0) + (self.green_hue - 120.0) + (self.blue_hue - 240.0)) / 3.0
    }
}

/// Rotate every chromatic color by the adjustment's mean offset (HSL space).
/// Near-gray colors (s < 0.01) and unparsable input pass through unchanged.
pub fn apply_hue_rotation(hex: &str, adjustment: &HueAdjustment) -> String {
    let Ok(swatch) = Swatch::parse(hex) else {
        return hex.to_string();
    };
    let [r, g, b] = swatch.to_unit();
    let (h, s, l) = rgb_to_hsl(r, g, b);
    if s < 0.01 {
        return hex.to_string();
    }
    let (r, g, b) = hsl_to_rgb(wrap_hue(h + adjustment.offset()), s, l);
    Swatch::from_unit(r, g, b).to_hex()
}
