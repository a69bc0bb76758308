/// Opaque filter handle for WASM
///
/// Holds a derived parameter set on the Rust side so a palette can be
/// re-rendered without re-sending or re-parsing the parameters for every
/// swatch. Rebuild the handle when sensitivity or difficulty change.

use wasm_bindgen::prelude::*;

use crate::cone::ConeSensitivity;
use crate::config::ModelConfig;
use crate::difficulty::DifficultySummary;
use crate::filter::{self, AdaptiveFilterParameters};
use crate::palette;

#[wasm_bindgen]
pub struct AdaptiveFilter {
    params: AdaptiveFilterParameters,
}

impl AdaptiveFilter {
    pub fn from_parameters(params: AdaptiveFilterParameters) -> Self {
        Self { params }
    }

    pub fn from_inputs(sensitivity: &ConeSensitivity, difficulty: &DifficultySummary, config: &ModelConfig) -> Self {
        Self::from_parameters(filter::compute_parameters_with(sensitivity, difficulty, &config.hyperparameters))
    }

    /// JSON inputs as accepted by the WASM constructor
    pub fn from_json(sensitivity_json: &str, difficulty_json: &str, config_json: Option<String>) -> Result<Self, String> {
        let config = crate::config_from_json(config_json)?;
        let sensitivity: ConeSensitivity = serde_json::from_str(sensitivity_json)
            .map_err(|e| format!("Invalid sensitivity JSON: {}", e))?;
        let difficulty = if difficulty_json.trim().is_empty() {
            config.difficulty.fallback
        } else {
            serde_json::from_str(difficulty_json).map_err(|e| format!("Invalid difficulty JSON: {}", e))?
        };
        Ok(Self::from_inputs(&sensitivity, &difficulty, &config))
    }

    pub fn parameters(&self) -> &AdaptiveFilterParameters {
        &self.params
    }

    pub fn adapt_all<'a, I>(&self, colors: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        colors.into_iter().map(|hex| filter::apply(hex, &self.params)).collect()
    }
}

#[wasm_bindgen]
impl AdaptiveFilter {
    /// Build from sensitivity and difficulty JSON; empty difficulty uses the default summary
    #[wasm_bindgen(constructor)]
    pub fn new(
        sensitivity_json: &str,
        difficulty_json: &str,
        config_json: Option<String>,
    ) -> Result<AdaptiveFilter, JsValue> {
        Self::from_json(sensitivity_json, difficulty_json, config_json).map_err(|e| JsValue::from_str(&e))
    }

    /// Build from a parameter set JSON produced by `compute_parameters`
    #[wasm_bindgen]
    pub fn from_parameters_json(params_json: &str) -> Result<AdaptiveFilter, JsValue> {
        let params: AdaptiveFilterParameters = serde_json::from_str(params_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid parameters JSON: {}", e)))?;
        Ok(Self::from_parameters(params))
    }

    /// Adapt one `#rrggbb` color; malformed input passes through
    #[wasm_bindgen]
    pub fn apply(&self, hex: &str) -> String {
        filter::apply(hex, &self.params)
    }

    /// Adapt an array of color strings; non-string entries become empty strings
    #[wasm_bindgen]
    pub fn apply_palette(&self, colors: js_sys::Array) -> js_sys::Array {
        colors
            .iter()
            .map(|value| JsValue::from_str(&self.apply(&value.as_string().unwrap_or_default())))
            .collect()
    }

    /// Color wheel preview as JSON `[{original, adapted}, ...]`
    #[wasm_bindgen]
    pub fn color_wheel_json(&self) -> String {
        serde_json::to_string(&palette::color_wheel(&self.params)).unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn parameters_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn saturation_multiplier(&self) -> f64 {
        self.params.saturation_multiplier
    }

    #[wasm_bindgen(getter)]
    pub fn value_lift(&self) -> f64 {
        self.params.value_lift
    }

    #[wasm_bindgen(getter)]
    pub fn hue_shift_deg(&self) -> f64 {
        self.params.hue_shift_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_from_inputs() {
        let handle = AdaptiveFilter::from_inputs(
            &ConeSensitivity::new(0.5, 0.9, 0.9),
            &DifficultySummary::DEFAULT,
            &ModelConfig::default(),
        );
        assert!((handle.parameters().gains.l - 1.425).abs() < 1e-12);
        assert!((handle.hue_shift_deg() - 4.2).abs() < 1e-12);
    }

    #[test]
    fn test_adapt_all_matches_single_apply() {
        let handle = AdaptiveFilter::from_inputs(
            &ConeSensitivity::INITIAL,
            &DifficultySummary::DEFAULT,
            &ModelConfig::default(),
        );
        let colors = ["#f28f8f", "#84a59d", "bogus"];
        let adapted = handle.adapt_all(colors);
        assert_eq!(adapted.len(), 3);
        assert_eq!(adapted[0], handle.apply("#f28f8f"));
        assert_eq!(adapted[2], "bogus");
    }

    #[test]
    fn test_handle_json_roundtrip() {
        let handle = AdaptiveFilter::from_parameters(AdaptiveFilterParameters::NEUTRAL);
        let json = handle.parameters_json();
        assert!(json.contains("\"saturationMultiplier\":1.0"), "{}", json);
        let wheel = handle.color_wheel_json();
        assert!(wheel.starts_with("[{\"original\":\"#"), "{}", wheel);
    }

    #[test]
    fn test_from_json_uses_config_overrides() {
        let sensitivity = r#"{"l": 0.5, "m": 0.9, "s": 0.9}"#;
        let handle = AdaptiveFilter::from_json(sensitivity, "", None).unwrap();
        assert!((handle.hue_shift_deg() - 4.2).abs() < 1e-12);

        let config = Some(r#"{"hyperparameters": {"deltaH": 20.0}}"#.to_string());
        let handle = AdaptiveFilter::from_json(sensitivity, "  ", config).unwrap();
        assert!((handle.hue_shift_deg() - 7.0).abs() < 1e-12);

        let err = AdaptiveFilter::from_json(sensitivity, "", Some("not json".into())).err().unwrap();
        assert!(err.contains("JSON"), "{}", err);
        assert!(AdaptiveFilter::from_json("{}", "", None).is_err());
    }
}
