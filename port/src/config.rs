//! Model configuration.
//!
//! Groups every tunable of the model: calibration step sizes, difficulty
//! normalization and the filter hyperparameters. Files may be TOML or JSON
//! and only need to name the values they override.
//!
//! ```toml
//! [hyperparameters]
//! deltaH = 16.0
//!
//! [calibration.l]
//! success = 0.04
//! failure = 0.02
//! min = 0.3
//! max = 1.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cone::{CalibrationSteps, ConeStep};
use crate::difficulty::DifficultyNormalization;
use crate::filter::Hyperparameters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub calibration: CalibrationSteps,
    pub difficulty: DifficultyNormalization,
    pub hyperparameters: Hyperparameters,
}

impl ModelConfig {
    /// Load from a file; `.json` files are parsed as JSON, everything else as TOML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_toml_str(&contents)?
        };
        debug!(path = %path.display(), "loaded model config");
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let steps = [("l", &self.calibration.l), ("m", &self.calibration.m), ("s", &self.calibration.s)];
        for (name, step) in steps {
            validate_step(name, step)?;
        }

        let d = &self.difficulty;
        for (name, scale) in [
            ("swipeScale", d.swipe_scale),
            ("searchTimeScale", d.search_time_scale),
            ("searchErrorScale", d.search_error_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::Invalid(format!("difficulty.{} must be positive, got {}", name, scale)));
            }
        }

        let h = &self.hyperparameters;
        let values = [
            h.alpha.l,
            h.alpha.m,
            h.alpha.s,
            h.beta_s,
            h.beta_v,
            h.delta_h,
            h.lambda,
            h.mu,
            h.problematic_hue_range[0],
            h.problematic_hue_range[1],
            h.center_hue,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("hyperparameters must be finite".into()));
        }
        if h.alpha.l < 0.0 || h.alpha.m < 0.0 || h.alpha.s < 0.0 {
            return Err(ConfigError::Invalid("alpha must be non-negative".into()));
        }
        Ok(())
    }
}

fn validate_step(name: &str, step: &ConeStep) -> Result<(), ConfigError> {
    let finite = [step.success, step.failure, step.min, step.max].iter().all(|v| v.is_finite());
    if !finite {
        return Err(ConfigError::Invalid(format!("calibration.{} must be finite", name)));
    }
    if step.min < 0.0 || step.max > 1.0 || step.min > step.max {
        return Err(ConfigError::Invalid(format!(
            "calibration.{} bounds [{}, {}] must satisfy 0 <= min <= max <= 1",
            name, step.min, step.max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ModelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_partial_toml_override() {
        let config = ModelConfig::from_toml_str(
            r#"
            [hyperparameters]
            deltaH = 16.0
            problematicHueRange = [300.0, 40.0]

            [difficulty]
            swipeScale = 20.0

            [calibration.l]
            success = 0.04
            failure = 0.02
            min = 0.3
            max = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.hyperparameters.delta_h, 16.0);
        assert_eq!(config.hyperparameters.beta_s, 0.45);
        assert_eq!(config.hyperparameters.problematic_hue_range, [300.0, 40.0]);
        assert_eq!(config.difficulty.swipe_scale, 20.0);
        assert_eq!(config.difficulty.search_time_scale, 14.0);
        assert_eq!(config.calibration.l.success, 0.04);
        assert_eq!(config.calibration.m, CalibrationSteps::default().m);
    }

    #[test]
    fn test_json_config() {
        let config = ModelConfig::from_json_str(r#"{"hyperparameters": {"alpha": {"l": 1.0, "m": 1.0, "s": 1.0}}}"#)
            .unwrap();
        assert_eq!(config.hyperparameters.alpha.l, 1.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ModelConfig::from_toml_str("[difficulty]\nswipeScale = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{}", err);

        let err = ModelConfig::from_toml_str("[calibration.s]\nsuccess = 0.1\nfailure = 0.1\nmin = 0.8\nmax = 0.2\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{}", err);

        let err = ModelConfig::from_toml_str("[hyperparameters]\ndeltaH = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{}", err);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelConfig::load_from_file("/nonexistent/cvd-model.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
