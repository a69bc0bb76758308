//! Study palettes: the preview color wheel and per-condition color routing.

use serde::{Deserialize, Serialize};

use crate::color::hsl_to_rgb;
use crate::difficulty::Condition;
use crate::filter::{apply, apply_swatch, AdaptiveFilterParameters};
use crate::swatch::Swatch;

const WHEEL_STEP_DEG: usize = 45;
const WHEEL_SATURATION: f64 = 0.6;
const WHEEL_LIGHTNESS: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelEntry {
    pub original: Swatch,
    pub adapted: Swatch,
}

/// Eight evenly spaced mid-tone hues with their adapted counterparts
pub fn color_wheel(params: &AdaptiveFilterParameters) -> Vec<WheelEntry> {
    (0..360)
        .step_by(WHEEL_STEP_DEG)
        .map(|hue| {
            let (r, g, b) = hsl_to_rgb(hue as f64, WHEEL_SATURATION, WHEEL_LIGHTNESS);
            let original = Swatch::from_unit(r, g, b);
            WheelEntry { original, adapted: apply_swatch(original, params) }
        })
        .collect()
}

/// The adaptive filter only runs under the adaptive condition
pub fn apply_for_condition(hex: &str, condition: Condition, params: &AdaptiveFilterParameters) -> String {
    match condition {
        Condition::Aui => apply(hex, params),
        Condition::Ios => hex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cone::ConeSensitivity;
    use crate::difficulty::DifficultySummary;
    use crate::filter::compute_parameters;

    #[test]
    fn test_wheel_layout() {
        let wheel = color_wheel(&AdaptiveFilterParameters::NEUTRAL);
        assert_eq!(wheel.len(), 8);
        // hsl(0, 60%, 60%) = rgb(214, 92, 92)
        assert_eq!(wheel[0].original, Swatch::new(214, 92, 92));
        // hsl(180, 60%, 60%)
        assert_eq!(wheel[4].original, Swatch::new(92, 214, 214));
        for entry in &wheel {
            let d = (entry.original.r as i32 - entry.adapted.r as i32).abs()
                + (entry.original.g as i32 - entry.adapted.g as i32).abs()
                + (entry.original.b as i32 - entry.adapted.b as i32).abs();
            assert!(d <= 3, "{:?}", entry);
        }
    }

    #[test]
    fn test_condition_routing() {
        let p = compute_parameters(&ConeSensitivity::new(0.5, 0.9, 0.9), &DifficultySummary::DEFAULT);
        assert_eq!(apply_for_condition("#f28f8f", Condition::Ios, &p), "#f28f8f");
        assert_ne!(apply_for_condition("#f28f8f", Condition::Aui, &p), "#f28f8f");
    }
}
