//! Cone-contrast threshold analysis.
//!
//! Scores the trials of a cone-contrast calibration run per cone class and
//! classifies the deficiency type. The stimulus staircase itself lives in the
//! UI; this module only consumes its recorded trials.

use serde::{Deserialize, Serialize};

use crate::cone::{CalibrationSteps, Cone, ConeSensitivity};

/// Number of trailing trials averaged into the threshold estimate
pub const THRESHOLD_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConeTrial {
    pub cone: Cone,
    /// Stimulus contrast in percent (0-100)
    pub contrast_percent: f64,
    pub response_time_ms: f64,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConeCategory {
    Normal,
    Possible,
    Deficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Protan,
    Deutan,
    Tritan,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConeMetrics {
    /// Mean contrast percent of the trailing window
    pub threshold: f64,
    pub std_error: f64,
    pub trials: usize,
    /// Mean response time in seconds over all trials
    pub avg_time: f64,
    /// log10 contrast sensitivity
    pub log_cs: f64,
    pub score: u32,
    pub category: ConeCategory,
}

/// Score one cone's trials. Returns `None` when there are no trials.
pub fn cone_metrics(trials: &[ConeTrial]) -> Option<ConeMetrics> {
    if trials.is_empty() {
        return None;
    }

    let window = &trials[trials.len().saturating_sub(THRESHOLD_WINDOW)..];
    let n = window.len() as f64;
    let threshold = window.iter().map(|t| t.contrast_percent).sum::<f64>() / n;

    let std_error = if window.len() > 1 {
        let sum_sq: f64 = window
            .iter()
            .map(|t| (t.contrast_percent - threshold).powi(2))
            .sum();
        (sum_sq / (n - 1.0)).sqrt() / n.sqrt()
    } else {
        0.0
    };

    let avg_time =
        trials.iter().map(|t| t.response_time_ms).sum::<f64>() / trials.len() as f64 / 1000.0;
    let log_cs = (1.0 / (threshold / 100.0).max(0.0001)).log10();
    let score = (log_cs * 75.0).clamp(0.0, 200.0).round() as u32;

    let mut category = ConeCategory::Normal;
    if threshold > 10.0 || score < 80 {
        category = ConeCategory::Possible;
    }
    if threshold > 25.0 || score < 50 {
        category = ConeCategory::Deficient;
    }

    Some(ConeMetrics {
        threshold,
        std_error,
        trials: trials.len(),
        avg_time,
        log_cs,
        score,
        category,
    })
}

/// A cone is flagged when it is not Normal and has the strictly highest threshold
pub fn detect_type(l: &ConeMetrics, m: &ConeMetrics, s: &ConeMetrics) -> DetectedType {
    if l.category != ConeCategory::Normal && l.threshold > m.threshold && l.threshold > s.threshold {
        DetectedType::Protan
    } else if m.category != ConeCategory::Normal && m.threshold > l.threshold && m.threshold > s.threshold {
        DetectedType::Deutan
    } else if s.category != ConeCategory::Normal && s.threshold > l.threshold && s.threshold > m.threshold {
        DetectedType::Tritan
    } else {
        DetectedType::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConeTestResult {
    pub l: ConeMetrics,
    pub m: ConeMetrics,
    pub s: ConeMetrics,
    pub detected_type: DetectedType,
}

impl ConeTestResult {
    /// Split a mixed trial log by cone and score each. `None` if any cone has no trials.
    pub fn from_trials(trials: &[ConeTrial]) -> Option<Self> {
        let of = |cone: Cone| -> Vec<ConeTrial> {
            trials.iter().filter(|t| t.cone == cone).copied().collect()
        };
        let l = cone_metrics(&of(Cone::L))?;
        let m = cone_metrics(&of(Cone::M))?;
        let s = cone_metrics(&of(Cone::S))?;
        Some(Self { l, m, s, detected_type: detect_type(&l, &m, &s) })
    }

    /// Map thresholds onto sensitivities (1 - threshold/100) within the calibration bounds
    pub fn sensitivity(&self, steps: &CalibrationSteps) -> ConeSensitivity {
        let map = |metrics: &ConeMetrics, cone: Cone| {
            let step = steps.step(cone);
            (1.0 - metrics.threshold / 100.0).clamp(step.min, step.max)
        };
        ConeSensitivity::new(map(&self.l, Cone::L), map(&self.m, Cone::M), map(&self.s, Cone::S))
    }
}
