//! Difficulty summarizer.
//!
//! Condenses the per-task metrics collected under each study condition into
//! one [`DifficultySummary`] that parameterizes the adaptive filter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::clamp01;

/// Interface condition a task block was run under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Stock OS color filter (baseline)
    Ios,
    /// Adaptive user interface (filter model applied)
    Aui,
}

/// Odd-color-out tile task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddMetric {
    #[serde(default)]
    pub reaction_time: f64,
    /// 0 or 1 for a single pick, or a continuous 0-1 ratio
    pub accuracy: f64,
    #[serde(default)]
    pub delta_level: f64,
}

/// Color-matching slider task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderMetric {
    #[serde(default)]
    pub time: f64,
    pub swipes: u32,
    /// Normalized matching error, 0-1
    pub error: f64,
}

/// Visual search with distractors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetric {
    /// Seconds to find the target
    pub time: f64,
    /// False taps before the target was found
    pub errors: u32,
}

/// Metrics gathered under one condition; any task may be missing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd: Option<OddMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchMetric>,
}

/// Task metrics keyed by condition
pub type StudyMetrics = BTreeMap<Condition, TaskMetrics>;

#[derive(Deserialize)]
#[serde(untagged)]
enum MetricsDocument {
    ByCondition(StudyMetrics),
    Records(Vec<TaskMetrics>),
}

/// Parse metrics given either keyed by condition or as a plain list of records
pub fn parse_metrics_json(json: &str) -> Result<Vec<TaskMetrics>, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        MetricsDocument::ByCondition(study) => study.into_values().collect(),
        MetricsDocument::Records(records) => records,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySummary {
    pub accuracy: f64,
    pub slider_error: f64,
    pub slider_swipes: f64,
    pub search_difficulty: f64,
}

impl DifficultySummary {
    /// Used before any task data exists
    pub const DEFAULT: DifficultySummary = DifficultySummary {
        accuracy: 0.65,
        slider_error: 0.35,
        slider_swipes: 0.4,
        search_difficulty: 0.5,
    };
}

impl Default for DifficultySummary {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scales that map raw task counts and times into roughly 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyNormalization {
    pub swipe_scale: f64,
    pub search_time_scale: f64,
    pub search_error_scale: f64,
    pub fallback: DifficultySummary,
}

impl Default for DifficultyNormalization {
    fn default() -> Self {
        Self {
            swipe_scale: 18.0,
            search_time_scale: 14.0,
            search_error_scale: 6.0,
            fallback: DifficultySummary::DEFAULT,
        }
    }
}

impl DifficultyNormalization {
    pub fn slider_swipes(&self, slider: &SliderMetric) -> f64 {
        slider.swipes as f64 / self.swipe_scale
    }

    /// Mean of normalized time and normalized error count, clamped to 0-1
    pub fn search_difficulty(&self, search: &SearchMetric) -> f64 {
        let time = search.time / self.search_time_scale;
        let errors = search.errors as f64 / self.search_error_scale;
        clamp01((time + errors) / 2.0)
    }
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn or(&self, fallback: f64) -> f64 {
        if self.count == 0 {
            fallback
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Summarize with the default normalization
pub fn summarize_difficulty<'a, I>(records: I) -> DifficultySummary
where
    I: IntoIterator<Item = &'a TaskMetrics>,
{
    summarize_difficulty_with(&DifficultyNormalization::default(), records)
}

/// Average each metric independently over the records that carry it.
///
/// A metric with no samples takes its fallback value; with no samples at
/// all the whole fallback summary is returned.
pub fn summarize_difficulty_with<'a, I>(norm: &DifficultyNormalization, records: I) -> DifficultySummary
where
    I: IntoIterator<Item = &'a TaskMetrics>,
{
    let mut accuracy = Mean::default();
    let mut slider_error = Mean::default();
    let mut slider_swipes = Mean::default();
    let mut search = Mean::default();

    for record in records {
        if let Some(odd) = &record.odd {
            accuracy.push(odd.accuracy);
        }
        if let Some(slider) = &record.slider {
            slider_error.push(slider.error);
            slider_swipes.push(norm.slider_swipes(slider));
        }
        if let Some(s) = &record.search {
            search.push(norm.search_difficulty(s));
        }
    }

    if accuracy.count == 0 && slider_error.count == 0 && search.count == 0 {
        return norm.fallback;
    }

    let fallback = &norm.fallback;
    DifficultySummary {
        accuracy: accuracy.or(fallback.accuracy),
        slider_error: slider_error.or(fallback.slider_error),
        slider_swipes: slider_swipes.or(fallback.slider_swipes),
        search_difficulty: search.or(fallback.search_difficulty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odd(accuracy: f64) -> Option<OddMetric> {
        Some(OddMetric { reaction_time: 1.2, accuracy, delta_level: 0.1 })
    }

    #[test]
    fn test_empty_returns_default() {
        let records: Vec<TaskMetrics> = Vec::new();
        let summary = summarize_difficulty(&records);
        assert_eq!(
            summary,
            DifficultySummary { accuracy: 0.65, slider_error: 0.35, slider_swipes: 0.4, search_difficulty: 0.5 }
        );

        // conditions with no tasks recorded count as empty too
        let summary = summarize_difficulty(&[TaskMetrics::default(), TaskMetrics::default()]);
        assert_eq!(summary, DifficultySummary::DEFAULT);
    }

    #[test]
    fn test_normalization() {
        let records = [TaskMetrics {
            odd: None,
            slider: Some(SliderMetric { time: 4.0, swipes: 9, error: 0.2 }),
            search: Some(SearchMetric { time: 7.0, errors: 3 }),
        }];
        let summary = summarize_difficulty(&records);
        assert!((summary.slider_swipes - 0.5).abs() < 1e-12);
        assert!((summary.slider_error - 0.2).abs() < 1e-12);
        assert!((summary.search_difficulty - 0.5).abs() < 1e-12);
        // no odd samples: that metric alone falls back
        assert_eq!(summary.accuracy, 0.65);
    }

    #[test]
    fn test_search_difficulty_clamped() {
        let records = [TaskMetrics {
            search: Some(SearchMetric { time: 60.0, errors: 20 }),
            ..Default::default()
        }];
        assert_eq!(summarize_difficulty(&records).search_difficulty, 1.0);
    }

    #[test]
    fn test_per_metric_averaging() {
        let records = [
            TaskMetrics { odd: odd(1.0), ..Default::default() },
            TaskMetrics {
                odd: odd(0.0),
                slider: Some(SliderMetric { time: 3.0, swipes: 18, error: 0.4 }),
                search: None,
            },
        ];
        let summary = summarize_difficulty(&records);
        assert!((summary.accuracy - 0.5).abs() < 1e-12, "both conditions count toward accuracy");
        assert!((summary.slider_swipes - 1.0).abs() < 1e-12);
        assert!((summary.slider_error - 0.4).abs() < 1e-12);
        assert_eq!(summary.search_difficulty, 0.5);
    }

    #[test]
    fn test_study_metrics_json() {
        let json = r#"{
            "ios": { "odd": { "reactionTime": 2.1, "accuracy": 0, "deltaLevel": 0.2 } },
            "aui": { "odd": { "reactionTime": 1.4, "accuracy": 1, "deltaLevel": 0.2 },
                     "search": { "time": 14, "errors": 0 } }
        }"#;
        let study: StudyMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(study.len(), 2);
        let summary = summarize_difficulty(study.values());
        assert!((summary.accuracy - 0.5).abs() < 1e-12);
        assert!((summary.search_difficulty - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_metrics_map_or_list() {
        let map = parse_metrics_json(r#"{"aui": {"odd": {"accuracy": 1}}, "ios": {"odd": {"accuracy": 0}}}"#).unwrap();
        let list = parse_metrics_json(r#"[{"odd": {"accuracy": 1}}, {"odd": {"accuracy": 0}}]"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(summarize_difficulty(&map), summarize_difficulty(&list));
        assert!(parse_metrics_json(r#"{"sighted": {}}"#).is_err());
        assert!(parse_metrics_json("{{").is_err());
    }
}
