//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without recompiling. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::curve::DifficultyCurve;

/// Easy/hard endpoints of a mode's spawn curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveRange {
    pub easy: DifficultyCurve,
    pub hard: DifficultyCurve,
}

impl CurveRange {
    pub const fn new(easy: DifficultyCurve, hard: DifficultyCurve) -> Self {
        Self { easy, hard }
    }
}

/// Timed spawn curve endpoints
pub const TIMED_CURVES: CurveRange = CurveRange::new(
    DifficultyCurve::new(2000.0, 550.0, 3.0),
    DifficultyCurve::new(1200.0, 350.0, 7.5),
);

/// Tracking spawn curve endpoints (slower than Timed everywhere)
pub const TRACKING_CURVES: CurveRange = CurveRange::new(
    DifficultyCurve::new(2600.0, 900.0, 2.0),
    DifficultyCurve::new(2000.0, 650.0, 3.6),
);

/// Complete balance sheet for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run ===
    /// Length of a full run (ms)
    pub game_ms: f64,
    /// Largest frame delta fed to motion integration (s)
    pub max_frame_dt: f32,

    // === Timed ===
    pub target_lifetime_ms: f64,
    pub expired_limit: u32,
    pub timed_size_min: u32,
    pub timed_size_max: u32,
    /// Size a Timed target shrinks down to at expiry
    pub timed_size_floor: f32,

    // === Tracking ===
    pub tracking_size_min: u32,
    pub tracking_size_max: u32,
    pub tracking_speed_min: u32,
    pub tracking_speed_max: u32,
    pub tracking_hp: i32,
    pub tracking_shield_hp: i32,
    pub overwhelm_limit: usize,

    // === Hits ===
    pub center_radius_ratio: f32,

    // === Spawning ===
    pub spawn_padding: f32,
    pub timed_curves: CurveRange,
    pub tracking_curves: CurveRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_ms: GAME_MS,
            max_frame_dt: MAX_FRAME_DT,

            target_lifetime_ms: TARGET_LIFETIME_MS,
            expired_limit: EXPIRED_LIMIT,
            timed_size_min: TARGET_START_SIZE_MIN,
            timed_size_max: TARGET_START_SIZE_MAX,
            timed_size_floor: TARGET_MIN_SIZE,

            tracking_size_min: TRACKING_SIZE_MIN,
            tracking_size_max: TRACKING_SIZE_MAX,
            tracking_speed_min: TRACKING_SPEED_MIN,
            tracking_speed_max: TRACKING_SPEED_MAX,
            tracking_hp: TRACKING_TARGET_HP,
            tracking_shield_hp: TRACKING_SHIELD_HP,
            overwhelm_limit: TRACKING_OVERWHELM_LIMIT,

            center_radius_ratio: CENTER_RADIUS_RATIO,

            spawn_padding: SPAWN_PADDING,
            timed_curves: TIMED_CURVES,
            tracking_curves: TRACKING_CURVES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from disk, falling back to defaults if the file is absent
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let tuning = Self::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No tuning at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(name: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { name, reason })
        }

        if self.game_ms <= 0.0 {
            return invalid("game_ms", "must be positive");
        }
        if self.target_lifetime_ms <= 0.0 {
            return invalid("target_lifetime_ms", "must be positive");
        }
        if self.expired_limit == 0 {
            return invalid("expired_limit", "must be at least 1");
        }
        if self.timed_size_min > self.timed_size_max {
            return invalid("timed_size_min", "exceeds timed_size_max");
        }
        if self.timed_size_floor > self.timed_size_min as f32 {
            return invalid("timed_size_floor", "exceeds timed_size_min");
        }
        if self.tracking_size_min > self.tracking_size_max {
            return invalid("tracking_size_min", "exceeds tracking_size_max");
        }
        if self.tracking_speed_min > self.tracking_speed_max {
            return invalid("tracking_speed_min", "exceeds tracking_speed_max");
        }
        if self.tracking_hp <= 0 {
            return invalid("tracking_hp", "must be positive");
        }
        if self.tracking_shield_hp < 0 {
            return invalid("tracking_shield_hp", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.center_radius_ratio) {
            return invalid("center_radius_ratio", "must be within 0..=1");
        }
        for (name, range) in [
            ("timed_curves", &self.timed_curves),
            ("tracking_curves", &self.tracking_curves),
        ] {
            if !range.easy.is_valid() || !range.hard.is_valid() {
                return invalid(name, "min_delay_ms exceeds start_delay_ms");
            }
        }
        Ok(())
    }
}
