//! Run state and core simulation types
//!
//! Everything a run mutates lives in one `RunContext` owned by the session
//! and lent by `&mut` to the update step, spawner and hit resolver.

use serde::{Deserialize, Serialize};

use super::collision::Arena;
use super::curve::{Curves, DifficultyCurve};
use super::pool::TargetPool;
use super::spawn::SpawnTimer;
use crate::settings::RunSettings;
use crate::tuning::Tuning;

/// Current phase of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress (before the first start, or after any end)
    #[default]
    Idle,
    /// Spawning, ticking and accepting presses
    Running,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Played the full run length
    Finished,
    /// Too many expirations (Timed) or too many live targets (Tracking)
    Overwhelmed,
    /// Restarted by the player mid-run
    Aborted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Finished => "finished",
            RunOutcome::Overwhelmed => "overwhelmed",
            RunOutcome::Aborted => "aborted",
        }
    }

    /// Only full-length runs compete for the best score
    pub fn records_score(&self) -> bool {
        matches!(self, RunOutcome::Finished)
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub points: u32,
    pub hits_outer: u32,
    pub hits_center: u32,
    /// Hits absorbed by a Tracking shield (count toward accuracy)
    pub hits_shield: u32,
    /// Presses on empty arena
    pub click_misses: u32,
    /// Timed targets that reached their deadline unclicked
    pub expired_misses: u32,
}

impl RunStats {
    pub fn hits_total(&self) -> u32 {
        self.hits_outer + self.hits_center + self.hits_shield
    }

    /// Hits over attempts; 0 when nothing was attempted
    pub fn accuracy(&self) -> f64 {
        let hits = self.hits_total();
        let attempts = hits + self.click_misses;
        if attempts == 0 {
            return 0.0;
        }
        f64::from(hits) / f64::from(attempts)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete mutable state of a run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub tuning: Tuning,
    pub arena: Arena,
    pub settings: RunSettings,
    pub curves: Curves,
    pub phase: RunPhase,
    pub stats: RunStats,
    pub pool: TargetPool,
    pub spawn_timer: SpawnTimer,
    /// Host clock at run start (ms)
    pub start_ms: f64,
    /// Host clock at the previous frame tick (ms)
    pub last_tick_ms: f64,
    /// Seed for the next run's spawn stream
    pub seed: u64,
}

impl RunContext {
    pub fn new(tuning: Tuning, arena: Arena, seed: u64) -> Self {
        let settings = RunSettings::default();
        let curves = Curves::for_difficulty(&tuning, settings.difficulty);
        Self {
            tuning,
            arena,
            settings,
            curves,
            phase: RunPhase::Idle,
            stats: RunStats::default(),
            pool: TargetPool::new(seed),
            spawn_timer: SpawnTimer::default(),
            start_ms: 0.0,
            last_tick_ms: 0.0,
            seed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Curve for the current run's mode
    pub fn curve(&self) -> &DifficultyCurve {
        self.curves.for_mode(self.settings.mode)
    }

    /// Time since run start, never negative
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.start_ms).max(0.0)
    }

    /// Time left in the run, never negative; full length while idle
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        if !self.is_running() {
            return self.tuning.game_ms;
        }
        (self.tuning.game_ms - self.elapsed_ms(now_ms)).max(0.0)
    }

    /// Host clock value at which the run reaches full length
    pub fn end_deadline_ms(&self) -> f64 {
        self.start_ms + self.tuning.game_ms
    }
}
