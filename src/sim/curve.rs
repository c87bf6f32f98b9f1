//! Difficulty curves
//!
//! A curve maps elapsed run time to the delay before the next spawn. The
//! difficulty slider (1..=10) picks a point between an easy and a hard curve
//! for each mode.

use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::settings::{DIFFICULTY_MAX, DIFFICULTY_MIN, GameMode};
use crate::tuning::{CurveRange, Tuning};

/// Spawn timing parameters for one mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    /// Delay at the start of a run (ms)
    pub start_delay_ms: f64,
    /// Floor the delay ramps down to (ms)
    pub min_delay_ms: f64,
    /// Milliseconds shaved off the delay per elapsed second
    pub ramp_per_second: f64,
}

impl DifficultyCurve {
    pub const fn new(start_delay_ms: f64, min_delay_ms: f64, ramp_per_second: f64) -> Self {
        Self {
            start_delay_ms,
            min_delay_ms,
            ramp_per_second,
        }
    }

    /// Normalize a 1..=10 difficulty to 0..=1
    pub fn difficulty_t(difficulty: u8) -> f64 {
        let d = difficulty.clamp(DIFFICULTY_MIN, DIFFICULTY_MAX);
        f64::from(d - DIFFICULTY_MIN) / f64::from(DIFFICULTY_MAX - DIFFICULTY_MIN)
    }

    /// Interpolate between the easy and hard endpoints of a range
    pub fn resolve(range: &CurveRange, difficulty: u8) -> Self {
        let t = Self::difficulty_t(difficulty);
        let (easy, hard) = (&range.easy, &range.hard);
        Self {
            start_delay_ms: lerp(easy.start_delay_ms, hard.start_delay_ms, t).round(),
            min_delay_ms: lerp(easy.min_delay_ms, hard.min_delay_ms, t).round(),
            ramp_per_second: lerp(easy.ramp_per_second, hard.ramp_per_second, t),
        }
    }

    /// Delay before the next spawn at `elapsed_secs` into the run
    pub fn delay_ms(&self, elapsed_secs: f64) -> f64 {
        let delay = self.start_delay_ms - elapsed_secs.max(0.0) * self.ramp_per_second;
        delay.clamp(self.min_delay_ms, self.start_delay_ms)
    }

    pub fn is_valid(&self) -> bool {
        self.min_delay_ms >= 0.0
            && self.min_delay_ms <= self.start_delay_ms
            && self.ramp_per_second >= 0.0
    }

    /// One-line summary for a difficulty hint
    pub fn describe(&self) -> String {
        format!(
            "start {}ms, min {}ms, ramp {:.1}ms/s",
            self.start_delay_ms, self.min_delay_ms, self.ramp_per_second
        )
    }
}

/// Resolved curves for both modes at one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curves {
    pub timed: DifficultyCurve,
    pub tracking: DifficultyCurve,
}

impl Curves {
    pub fn for_difficulty(tuning: &Tuning, difficulty: u8) -> Self {
        Self {
            timed: DifficultyCurve::resolve(&tuning.timed_curves, difficulty),
            tracking: DifficultyCurve::resolve(&tuning.tracking_curves, difficulty),
        }
    }

    pub fn for_mode(&self, mode: GameMode) -> &DifficultyCurve {
        match mode {
            GameMode::Timed => &self.timed,
            GameMode::Tracking => &self.tracking,
        }
    }

    /// Hint text shown next to the difficulty slider
    pub fn describe(&self) -> String {
        format!(
            "Timed: {} | Tracking: {}",
            self.timed.describe(),
            self.tracking.describe()
        )
    }
}
