//! Starting values for the manual adjustment panel.
//!
//! Picks the reference cone profile nearest to the measured sensitivities and
//! nudges its settings when the participant's recent runs were slow or
//! inaccurate.

use serde::{Deserialize, Serialize};

use crate::cone::ConeSensitivity;
use crate::results::{phased_runs, TrialRun};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualParams {
    pub h_shift: f64,
    pub s_mult: f64,
    pub l_mult: f64,
    pub extra_contrast: f64,
}

struct Profile {
    cones: ConeSensitivity,
    manual: ManualParams,
}

const fn profile(l: f64, m: f64, s: f64, h_shift: f64, s_mult: f64, l_mult: f64, extra_contrast: f64) -> Profile {
    Profile {
        cones: ConeSensitivity::new(l, m, s),
        manual: ManualParams { h_shift, s_mult, l_mult, extra_contrast },
    }
}

const PROFILES: [Profile; 4] = [
    profile(0.4, 0.85, 0.85, 10.0, 1.1, 1.0, 5.0),
    profile(0.85, 0.6, 0.85, -8.0, 1.1, 1.0, 4.0),
    profile(0.85, 0.85, 0.55, 6.0, 1.0, 1.05, 5.0),
    profile(0.9, 0.9, 0.9, 0.0, 1.0, 1.0, 3.0),
];

const LOW_ACCURACY: f64 = 0.8;
const SLOW_RUN_MS: f64 = 6000.0;

fn distance(a: &ConeSensitivity, b: &ConeSensitivity) -> f64 {
    ((a.l - b.l).powi(2) + (a.m - b.m).powi(2) + (a.s - b.s).powi(2)).sqrt()
}

/// Nearest reference profile, nudged by the phased runs in `history`
pub fn recommend_manual_params(cones: &ConeSensitivity, history: &[TrialRun]) -> ManualParams {
    let mut best = &PROFILES[0];
    let mut best_d = distance(cones, &best.cones);
    for p in &PROFILES[1..] {
        let d = distance(cones, &p.cones);
        if d < best_d {
            best_d = d;
            best = p;
        }
    }

    let mut params = best.manual;
    let runs: Vec<&TrialRun> = phased_runs(history).collect();
    if !runs.is_empty() {
        let n = runs.len() as f64;
        let avg_ms = runs.iter().map(|r| r.ms).sum::<f64>() / n;
        let accuracy = runs.iter().filter(|r| r.correct).count() as f64 / n;
        if accuracy < LOW_ACCURACY {
            params.extra_contrast += 2.0;
            params.s_mult += 0.05;
        }
        if avg_ms > SLOW_RUN_MS {
            params.extra_contrast += 1.0;
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Phase;

    #[test]
    fn test_nearest_profile() {
        let p = recommend_manual_params(&ConeSensitivity::new(0.45, 0.8, 0.9), &[]);
        assert_eq!(p.h_shift, 10.0);
        let p = recommend_manual_params(&ConeSensitivity::new(0.8, 0.55, 0.8), &[]);
        assert_eq!(p.h_shift, -8.0);
        let p = recommend_manual_params(&ConeSensitivity::new(0.85, 0.85, 0.5), &[]);
        assert_eq!(p.l_mult, 1.05);
        let p = recommend_manual_params(&ConeSensitivity::new(1.0, 1.0, 1.0), &[]);
        assert_eq!(p, ManualParams { h_shift: 0.0, s_mult: 1.0, l_mult: 1.0, extra_contrast: 3.0 });
    }

    #[test]
    fn test_history_adjustments() {
        let cones = ConeSensitivity::new(0.9, 0.9, 0.9);
        let history = [
            TrialRun::new(7000.0, false, Phase::Nonadaptive),
            TrialRun::new(6500.0, true, Phase::Adaptive),
        ];
        let p = recommend_manual_params(&cones, &history);
        assert_eq!(p.extra_contrast, 6.0);
        assert!((p.s_mult - 1.05).abs() < 1e-12);

        let fast_and_right = [TrialRun::new(1200.0, true, Phase::Adaptive)];
        let p = recommend_manual_params(&cones, &fast_and_right);
        assert_eq!(p.extra_contrast, 3.0);
        assert_eq!(p.s_mult, 1.0);
    }

    #[test]
    fn test_unphased_runs_are_ignored() {
        let cones = ConeSensitivity::new(0.9, 0.9, 0.9);
        let baseline = recommend_manual_params(&cones, &[]);
        let unphased = [
            TrialRun { ms: 9000.0, correct: false, phase: None },
            TrialRun { ms: 9500.0, correct: false, phase: Some(String::new()) },
        ];
        assert_eq!(recommend_manual_params(&cones, &unphased), baseline);

        let mut mixed = unphased.to_vec();
        mixed.push(TrialRun::new(1000.0, true, Phase::Adaptive));
        assert_eq!(recommend_manual_params(&cones, &mixed), baseline);
    }
}
