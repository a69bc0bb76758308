//! Study results aggregation.
//!
//! Two views feed the results dashboard: the trial log split by study phase
//! (non-adaptive vs adaptive runs), and the task metrics side by side per
//! interface condition.

use serde::{Deserialize, Serialize};

use crate::difficulty::{Condition, StudyMetrics, TaskMetrics};

/// Study phase a task run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Nonadaptive,
    Adaptive,
}

impl Phase {
    pub fn from_label(label: &str) -> Option<Phase> {
        match label {
            "nonadaptive" => Some(Phase::Nonadaptive),
            "adaptive" => Some(Phase::Adaptive),
            _ => None,
        }
    }
}

/// One entry of the trial log.
///
/// Survey answers and practice runs share the log but carry no phase; only
/// phased entries count as task runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialRun {
    #[serde(default)]
    pub ms: f64,
    #[serde(default)]
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl TrialRun {
    pub fn new(ms: f64, correct: bool, phase: Phase) -> Self {
        let label = match phase {
            Phase::Nonadaptive => "nonadaptive",
            Phase::Adaptive => "adaptive",
        };
        Self { ms, correct, phase: Some(label.to_string()) }
    }

    /// Entries with a non-empty phase label are task runs
    pub fn is_phased(&self) -> bool {
        self.phase.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn study_phase(&self) -> Option<Phase> {
        self.phase.as_deref().and_then(Phase::from_label)
    }
}

/// Phased entries of a trial log
pub fn phased_runs(history: &[TrialRun]) -> impl Iterator<Item = &TrialRun> {
    history.iter().filter(|r| r.is_phased())
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStats {
    pub trials: usize,
    /// Rounded mean run time; 0 with no runs
    pub mean_ms: f64,
    /// Rounded percent correct; 0 with no runs
    pub accuracy_percent: f64,
}

impl PhaseStats {
    fn from_runs<'a, I>(runs: I) -> Self
    where
        I: IntoIterator<Item = &'a TrialRun>,
    {
        let (mut trials, mut total_ms, mut correct) = (0usize, 0.0, 0usize);
        for run in runs {
            trials += 1;
            total_ms += run.ms;
            correct += run.correct as usize;
        }
        if trials == 0 {
            return Self::default();
        }
        let n = trials as f64;
        Self {
            trials,
            mean_ms: (total_ms / n).round(),
            accuracy_percent: (100.0 * correct as f64 / n).round(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseComparison {
    pub nonadaptive: PhaseStats,
    pub adaptive: PhaseStats,
    /// Rounded percent reduction of mean time; 0 unless both phases have a nonzero mean
    pub time_improvement_percent: f64,
    /// Adaptive minus non-adaptive accuracy, in percentage points
    pub accuracy_delta: f64,
}

pub fn summarize_runs(history: &[TrialRun]) -> PhaseComparison {
    let of = |phase: Phase| PhaseStats::from_runs(phased_runs(history).filter(move |r| r.study_phase() == Some(phase)));
    let nonadaptive = of(Phase::Nonadaptive);
    let adaptive = of(Phase::Adaptive);

    let time_improvement_percent = if nonadaptive.mean_ms != 0.0 && adaptive.mean_ms != 0.0 {
        (100.0 * (nonadaptive.mean_ms - adaptive.mean_ms) / nonadaptive.mean_ms).round()
    } else {
        0.0
    };

    PhaseComparison {
        nonadaptive,
        adaptive,
        time_improvement_percent,
        accuracy_delta: adaptive.accuracy_percent - nonadaptive.accuracy_percent,
    }
}

/// A value per interface condition
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerCondition<T> {
    pub ios: T,
    pub aui: T,
}

impl<T> PerCondition<T> {
    fn from_fn(mut f: impl FnMut(Condition) -> T) -> Self {
        Self { ios: f(Condition::Ios), aui: f(Condition::Aui) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionComparison {
    pub reaction: PerCondition<f64>,
    pub accuracy: PerCondition<f64>,
    pub slider_swipes: PerCondition<u32>,
    pub slider_error: PerCondition<f64>,
    pub search_errors: PerCondition<u32>,
}

/// Mean of the recorded task times (odd reaction time, slider time, search time),
/// rounded to two decimals; 0 when none were recorded
pub fn condition_mean_time(metrics: &TaskMetrics) -> f64 {
    let times = [
        metrics.odd.map(|o| o.reaction_time),
        metrics.slider.map(|s| s.time),
        metrics.search.map(|s| s.time),
    ];
    let (sum, count) = times.iter().flatten().fold((0.0, 0usize), |(sum, n), t| (sum + t, n + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64 * 100.0).round() / 100.0
}

/// Side-by-side task metrics; a missing condition or task reads as 0
pub fn compare_conditions(study: &StudyMetrics) -> ConditionComparison {
    let empty = TaskMetrics::default();
    let get = |c: Condition| study.get(&c).unwrap_or(&empty);
    ConditionComparison {
        reaction: PerCondition::from_fn(|c| condition_mean_time(get(c))),
        accuracy: PerCondition::from_fn(|c| get(c).odd.map_or(0.0, |o| o.accuracy)),
        slider_swipes: PerCondition::from_fn(|c| get(c).slider.map_or(0, |s| s.swipes)),
        slider_error: PerCondition::from_fn(|c| get(c).slider.map_or(0.0, |s| s.error)),
        search_errors: PerCondition::from_fn(|c| get(c).search.map_or(0, |s| s.errors)),
    }
}
