/// Adaptive CVD color filter model - Rust/WASM
///
/// Cone sensitivity calibration, task-difficulty aggregation and the adaptive
/// color filter used by the CVD interface study. Records cross the WASM
/// boundary as JSON strings; colors cross as `#rrggbb` strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod calibration;
pub mod color;
pub mod cone;
pub mod config;
pub mod difficulty;
pub mod filter;
pub mod handle;
pub mod palette;
pub mod preset;
pub mod recommend;
pub mod results;
pub mod swatch;

pub use cone::{Cone, ConeSensitivity};
pub use config::{ConfigError, ModelConfig};
pub use difficulty::{DifficultySummary, TaskMetrics};
pub use filter::{AdaptiveFilterParameters, Hyperparameters};
pub use handle::AdaptiveFilter;
pub use swatch::Swatch;

use calibration::{ConeTestResult, ConeTrial};
use preset::{HueAdjustment, OsPreset};
use results::TrialRun;

// ============================================================================
// JSON helpers
// ============================================================================

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Config from optional JSON; empty or missing means defaults
pub(crate) fn config_from_json(config_json: Option<String>) -> Result<ModelConfig, String> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(ModelConfig::default()),
        Some(json) => ModelConfig::from_json_str(json).map_err(|e| e.to_string()),
    }
}

fn summarize_json(metrics_json: &str, config: &ModelConfig) -> Result<DifficultySummary, String> {
    let records = difficulty::parse_metrics_json(metrics_json).map_err(|e| format!("Invalid metrics JSON: {}", e))?;
    Ok(difficulty::summarize_difficulty_with(&config.difficulty, &records))
}

// ============================================================================
// Cone sensitivity
// ============================================================================

/// Neutral starting sensitivity as JSON
#[wasm_bindgen]
pub fn initial_sensitivity(config_json: Option<String>) -> Result<String, JsValue> {
    let config = config_from_json(config_json).map_err(js_err)?;
    to_json(&config.calibration.initial).map_err(js_err)
}

/// Apply one calibration trial outcome to all three channels
#[wasm_bindgen]
pub fn update_sensitivity(sensitivity_json: &str, success: bool, config_json: Option<String>) -> Result<String, JsValue> {
    let config = config_from_json(config_json).map_err(js_err)?;
    let current: ConeSensitivity = from_json(sensitivity_json, "sensitivity").map_err(js_err)?;
    to_json(&cone::update_with(&config.calibration, current, success)).map_err(js_err)
}

/// Apply one calibration trial outcome to a single channel (0 = L, 1 = M, 2 = S)
#[wasm_bindgen]
pub fn update_cone_sensitivity(
    sensitivity_json: &str,
    cone_index: u8,
    success: bool,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let config = config_from_json(config_json).map_err(js_err)?;
    let target = Cone::from_u8(cone_index)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown cone index {}", cone_index)))?;
    let current: ConeSensitivity = from_json(sensitivity_json, "sensitivity").map_err(js_err)?;
    to_json(&cone::update_cone_with(&config.calibration, current, target, success)).map_err(js_err)
}

/// Score a cone-contrast trial log. Returns the result JSON, or null if a cone has no trials.
#[wasm_bindgen]
pub fn analyze_cone_test(trials_json: &str) -> Result<Option<String>, JsValue> {
    let trials: Vec<ConeTrial> = from_json(trials_json, "trials").map_err(js_err)?;
    ConeTestResult::from_trials(&trials)
        .map(|result| to_json(&result))
        .transpose()
        .map_err(js_err)
}

// ============================================================================
// Difficulty and filter parameters
// ============================================================================

#[wasm_bindgen]
pub fn summarize_difficulty(metrics_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = config_from_json(config_json).map_err(js_err)?;
    let summary = summarize_json(metrics_json, &config).map_err(js_err)?;
    to_json(&summary).map_err(js_err)
}

/// Derive the filter parameter set. An empty difficulty string uses the default summary.
#[wasm_bindgen]
pub fn compute_parameters(
    sensitivity_json: &str,
    difficulty_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let adaptive = AdaptiveFilter::from_json(sensitivity_json, difficulty_json, config_json).map_err(js_err)?;
    to_json(adaptive.parameters()).map_err(js_err)
}

// ============================================================================
// Color transforms
// ============================================================================

/// Adapt one color with a parameter set. Malformed colors pass through.
/// For repeated lookups build an [`AdaptiveFilter`] once instead.
#[wasm_bindgen]
pub fn apply_adaptive_filter(hex: &str, params_json: &str) -> Result<String, JsValue> {
    let params: AdaptiveFilterParameters = from_json(params_json, "parameters").map_err(js_err)?;
    Ok(filter::apply(hex, &params))
}

/// Apply an OS preset by name (protanopia, deuteranopia, tritanopia, grayscale)
#[wasm_bindgen]
pub fn apply_os_preset(hex: &str, preset: &str) -> Result<String, JsValue> {
    let preset = OsPreset::from_name(preset).ok_or_else(|| JsValue::from_str(&format!("Unknown preset {:?}", preset)))?;
    Ok(preset.apply(hex))
}

/// Recommended OS preset name for a detected deficiency type
#[wasm_bindgen]
pub fn recommended_os_preset(detected_type: &str) -> String {
    let detected = match detected_type.to_ascii_lowercase().as_str() {
        "protan" => calibration::DetectedType::Protan,
        "deutan" => calibration::DetectedType::Deutan,
        "tritan" => calibration::DetectedType::Tritan,
        _ => calibration::DetectedType::Normal,
    };
    OsPreset::recommended_for(detected).name().to_string()
}

/// Global hue rotation from user-picked primaries
#[wasm_bindgen]
pub fn apply_hue_rotation(hex: &str, red_hue: f64, green_hue: f64, blue_hue: f64) -> String {
    preset::apply_hue_rotation(hex, &HueAdjustment { red_hue, green_hue, blue_hue })
}

/// Manual adjustment starting point as JSON
#[wasm_bindgen]
pub fn recommend_manual_params(sensitivity_json: &str, history_json: &str) -> Result<String, JsValue> {
    let cones: ConeSensitivity = from_json(sensitivity_json, "sensitivity").map_err(js_err)?;
    let history: Vec<TrialRun> = if history_json.trim().is_empty() {
        Vec::new()
    } else {
        from_json(history_json, "history").map_err(js_err)?
    };
    to_json(&recommend::recommend_manual_params(&cones, &history)).map_err(js_err)
}

// ============================================================================
// Study results
// ============================================================================

/// Per-phase time and accuracy over a trial log; entries without a phase are skipped
#[wasm_bindgen]
pub fn summarize_trial_runs(trials_json: &str) -> Result<String, JsValue> {
    let history: Vec<TrialRun> = from_json(trials_json, "trials").map_err(js_err)?;
    to_json(&results::summarize_runs(&history)).map_err(js_err)
}

/// Side-by-side task metrics for the two interface conditions
#[wasm_bindgen]
pub fn compare_conditions(metrics_json: &str) -> Result<String, JsValue> {
    let study: difficulty::StudyMetrics = from_json(metrics_json, "metrics").map_err(js_err)?;
    to_json(&results::compare_conditions(&study)).map_err(js_err)
}
