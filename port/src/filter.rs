//! Adaptive filter engine.
//!
//! [`compute_parameters`] turns cone sensitivities and a difficulty summary
//! into an [`AdaptiveFilterParameters`] set; [`apply`] runs one color through
//!
//! sRGB -> linear -> LMS -> gain-compensated LMS -> linear -> sRGB -> HSV
//! (saturation boost, value lift, banded hue shift) -> sRGB
//!
//! Both are pure. Callers re-run them on every render; memoize the parameter
//! set if only the colors change.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::color::{
    clamp01, hsv_to_rgb, linear_rgb_to_lms, linear_to_srgb_single, lms_to_linear_rgb, rgb_to_hsv,
    srgb_u8_to_linear, wrap_hue,
};
use crate::cone::ConeSensitivity;
use crate::difficulty::DifficultySummary;
use crate::swatch::Swatch;

/// Per-cone multiplier applied in LMS space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeGains {
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl ConeGains {
    pub const UNIT: ConeGains = ConeGains { l: 1.0, m: 1.0, s: 1.0 };
}

/// Tunable model constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hyperparameters {
    /// Gain slope per cone: gain = 1 + alpha * (1 - sensitivity)
    pub alpha: ConeGains,
    /// Saturation boost per unit of matching difficulty
    pub beta_s: f64,
    /// Value lift per unit of search difficulty
    pub beta_v: f64,
    /// Maximum hue shift in degrees
    pub delta_h: f64,
    /// Weight of slider swipes in matching difficulty
    pub lambda: f64,
    /// Extra weight of search difficulty on itself
    pub mu: f64,
    pub problematic_hue_range: [f64; 2],
    pub center_hue: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: ConeGains { l: 0.85, m: 0.8, s: 0.75 },
            beta_s: 0.45,
            beta_v: 0.35,
            delta_h: 12.0,
            lambda: 0.35,
            mu: 0.25,
            problematic_hue_range: [330.0, 30.0],
            center_hue: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveFilterParameters {
    pub gains: ConeGains,
    pub saturation_multiplier: f64,
    pub value_lift: f64,
    pub hue_shift_deg: f64,
    /// Inclusive hue band [start, end] in degrees; wraps through 0 when start > end
    pub problematic_hue_range: [f64; 2],
    pub center_hue: f64,
}

impl AdaptiveFilterParameters {
    /// Parameters under which [`apply`] reproduces its input (up to rounding)
    pub const NEUTRAL: AdaptiveFilterParameters = AdaptiveFilterParameters {
        gains: ConeGains::UNIT,
        saturation_multiplier: 1.0,
        value_lift: 0.0,
        hue_shift_deg: 0.0,
        problematic_hue_range: [330.0, 30.0],
        center_hue: 0.0,
    };
}

/// Derive a parameter set with the default hyperparameters
pub fn compute_parameters(sensitivity: &ConeSensitivity, difficulty: &DifficultySummary) -> AdaptiveFilterParameters {
    compute_parameters_with(sensitivity, difficulty, &Hyperparameters::default())
}

pub fn compute_parameters_with(
    sensitivity: &ConeSensitivity,
    difficulty: &DifficultySummary,
    hyper: &Hyperparameters,
) -> AdaptiveFilterParameters {
    let gain = |alpha: f64, s: f64| 1.0 + alpha * (1.0 - clamp01(s));
    let gains = ConeGains {
        l: gain(hyper.alpha.l, sensitivity.l),
        m: gain(hyper.alpha.m, sensitivity.m),
        s: gain(hyper.alpha.s, sensitivity.s),
    };

    let difficulty_accuracy = clamp01(1.0 - difficulty.accuracy);
    let difficulty_match = clamp01(difficulty.slider_error + hyper.lambda * difficulty.slider_swipes);
    let difficulty_search =
        clamp01(difficulty.search_difficulty + hyper.mu * difficulty.search_difficulty * 0.5);

    let params = AdaptiveFilterParameters {
        gains,
        saturation_multiplier: 1.0 + hyper.beta_s * difficulty_match,
        value_lift: hyper.beta_v * difficulty_search,
        hue_shift_deg: hyper.delta_h * difficulty_accuracy,
        problematic_hue_range: hyper.problematic_hue_range,
        center_hue: hyper.center_hue,
    };
    debug!(
        gain_l = gains.l,
        gain_m = gains.m,
        gain_s = gains.s,
        saturation = params.saturation_multiplier,
        value_lift = params.value_lift,
        hue_shift = params.hue_shift_deg,
        "derived adaptive filter parameters"
    );
    params
}

/// Inclusive hue-band membership. A band with start > end wraps through 0.
pub fn is_within_hue_range(h: f64, range: [f64; 2]) -> bool {
    let [start, end] = range;
    if start <= end {
        h >= start && h <= end
    } else {
        h >= start || h <= end
    }
}

/// Adapt a `#rrggbb` color. Input that does not parse is returned unchanged.
pub fn apply(hex: &str, params: &AdaptiveFilterParameters) -> String {
    match Swatch::parse(hex) {
        Ok(swatch) => apply_swatch(swatch, params).to_hex(),
        Err(err) => {
            trace!(input = hex, %err, "passing unparsed color through");
            hex.to_string()
        }
    }
}

pub fn apply_swatch(swatch: Swatch, params: &AdaptiveFilterParameters) -> Swatch {
    let linear = [
        srgb_u8_to_linear(swatch.r),
        srgb_u8_to_linear(swatch.g),
        srgb_u8_to_linear(swatch.b),
    ];

    let lms = linear_rgb_to_lms(linear);
    let compensated = [lms[0] * params.gains.l, lms[1] * params.gains.m, lms[2] * params.gains.s];
    let back = lms_to_linear_rgb(compensated);

    let r = clamp01(linear_to_srgb_single(back[0]));
    let g = clamp01(linear_to_srgb_single(back[1]));
    let b = clamp01(linear_to_srgb_single(back[2]));

    // The band test uses the hue after LMS compensation
    let (h0, s0, v0) = rgb_to_hsv(r, g, b);
    let s = clamp01(s0 * params.saturation_multiplier);
    let v = clamp01(v0 + params.value_lift * (1.0 - v0));

    let h = if is_within_hue_range(h0, params.problematic_hue_range) {
        let center = params.center_hue;
        let direction = if h0 >= center && h0 <= center + 180.0 { 1.0 } else { -1.0 };
        wrap_hue(h0 + direction * params.hue_shift_deg)
    } else {
        h0
    };

    let (r, g, b) = hsv_to_rgb(h, s, v);
    Swatch::from_unit(r, g, b)
}
