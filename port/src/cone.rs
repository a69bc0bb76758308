/// Cone sensitivity model
///
/// Holds the current L/M/S sensitivity estimate (0-1, lower = more deficient)
/// and moves it one step per calibration trial. Updates are pure: the caller
/// owns the running value.

use serde::{Deserialize, Serialize};

use crate::color::clamp01;

/// Cone class targeted by a calibration trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cone {
    #[serde(alias = "l")]
    L,
    #[serde(alias = "m")]
    M,
    #[serde(alias = "s")]
    S,
}

impl Cone {
    pub const ALL: [Cone; 3] = [Cone::L, Cone::M, Cone::S];

    pub fn from_u8(value: u8) -> Option<Cone> {
        match value {
            0 => Some(Cone::L),
            1 => Some(Cone::M),
            2 => Some(Cone::S),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeSensitivity {
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl ConeSensitivity {
    /// Neutral starting estimate for a new session
    pub const INITIAL: ConeSensitivity = ConeSensitivity { l: 0.78, m: 0.74, s: 0.58 };

    pub const fn new(l: f64, m: f64, s: f64) -> Self {
        Self { l, m, s }
    }

    pub fn get(&self, cone: Cone) -> f64 {
        match cone {
            Cone::L => self.l,
            Cone::M => self.m,
            Cone::S => self.s,
        }
    }

    fn set(&mut self, cone: Cone, value: f64) {
        match cone {
            Cone::L => self.l = value,
            Cone::M => self.m = value,
            Cone::S => self.s = value,
        }
    }

    /// Copy with every channel clamped to 0-1
    pub fn clamped(self) -> Self {
        Self::new(clamp01(self.l), clamp01(self.m), clamp01(self.s))
    }
}

impl Default for ConeSensitivity {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Step sizes and valid range for one cone channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeStep {
    pub success: f64,
    pub failure: f64,
    pub min: f64,
    pub max: f64,
}

impl ConeStep {
    #[inline]
    fn apply(&self, value: f64, success: bool) -> f64 {
        let delta = if success { self.success } else { -self.failure };
        let next = value + delta;
        if next.is_nan() {
            return self.min;
        }
        next.clamp(self.min, self.max)
    }
}

/// Per-cone calibration step configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSteps {
    pub initial: ConeSensitivity,
    pub l: ConeStep,
    pub m: ConeStep,
    pub s: ConeStep,
}

impl Default for CalibrationSteps {
    fn default() -> Self {
        Self {
            initial: ConeSensitivity::INITIAL,
            l: ConeStep { success: 0.03, failure: 0.02, min: 0.35, max: 1.0 },
            m: ConeStep { success: 0.028, failure: 0.018, min: 0.35, max: 1.0 },
            s: ConeStep { success: 0.025, failure: 0.02, min: 0.3, max: 1.0 },
        }
    }
}

impl CalibrationSteps {
    pub fn step(&self, cone: Cone) -> &ConeStep {
        match cone {
            Cone::L => &self.l,
            Cone::M => &self.m,
            Cone::S => &self.s,
        }
    }
}

/// Starting sensitivity for a new session
pub fn initial() -> ConeSensitivity {
    CalibrationSteps::default().initial
}

/// Nudge all three channels after a calibration trial, using default steps
pub fn update(current: ConeSensitivity, success: bool) -> ConeSensitivity {
    update_with(&CalibrationSteps::default(), current, success)
}

/// Nudge only the channel a trial targeted, using default steps
pub fn update_cone(current: ConeSensitivity, cone: Cone, success: bool) -> ConeSensitivity {
    update_cone_with(&CalibrationSteps::default(), current, cone, success)
}

pub fn update_with(steps: &CalibrationSteps, current: ConeSensitivity, success: bool) -> ConeSensitivity {
    let mut next = current;
    for cone in Cone::ALL {
        next.set(cone, steps.step(cone).apply(current.get(cone), success));
    }
    next
}

pub fn update_cone_with(
    steps: &CalibrationSteps,
    current: ConeSensitivity,
    cone: Cone,
    success: bool,
) -> ConeSensitivity {
    let mut next = current;
    next.set(cone, steps.step(cone).apply(current.get(cone), success));
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        let s = initial();
        assert_eq!(s, ConeSensitivity::new(0.78, 0.74, 0.58));
    }

    #[test]
    fn test_update_success_and_failure() {
        let s = update(initial(), true);
        assert!((s.l - 0.81).abs() < 1e-12);
        assert!((s.m - 0.768).abs() < 1e-12);
        assert!((s.s - 0.605).abs() < 1e-12);

        let s = update(initial(), false);
        assert!((s.l - 0.76).abs() < 1e-12);
        assert!((s.m - 0.722).abs() < 1e-12);
        assert!((s.s - 0.56).abs() < 1e-12);
    }

    #[test]
    fn test_update_clamps_at_bounds() {
        let mut s = initial();
        for _ in 0..100 {
            s = update(s, true);
        }
        assert_eq!(s, ConeSensitivity::new(1.0, 1.0, 1.0));

        for _ in 0..200 {
            s = update(s, false);
        }
        assert_eq!(s, ConeSensitivity::new(0.35, 0.35, 0.3));
    }

    #[test]
    fn test_update_pulls_out_of_range_values_back() {
        let s = update(ConeSensitivity::new(-4.0, 7.0, f64::NAN), true);
        assert_eq!(s.l, 0.35);
        assert_eq!(s.m, 1.0);
        assert_eq!(s.s, 0.3);
    }

    #[test]
    fn test_update_cone_touches_one_channel() {
        let start = initial();
        let s = update_cone(start, Cone::M, false);
        assert_eq!(s.l, start.l);
        assert_eq!(s.s, start.s);
        assert!((s.m - 0.722).abs() < 1e-12);
    }

    #[test]
    fn test_custom_steps() {
        let mut steps = CalibrationSteps::default();
        steps.s = ConeStep { success: 0.5, failure: 0.5, min: 0.0, max: 0.9 };
        let s = update_cone_with(&steps, initial(), Cone::S, true);
        assert_eq!(s.s, 0.9);
    }
}
