//! Run settings snapshot
//!
//! Read once when a run starts; the session never sees the widgets that
//! produced it.

use serde::{Deserialize, Serialize};

/// Lowest difficulty setting
pub const DIFFICULTY_MIN: u8 = 1;
/// Highest difficulty setting
pub const DIFFICULTY_MAX: u8 = 10;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Targets shrink and expire; let five expire and the run is over
    #[default]
    Timed,
    /// Targets move and carry hit points (and optionally shields)
    Tracking,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Timed, GameMode::Tracking];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Timed => "Timed",
            GameMode::Tracking => "Tracking",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "timed" => Some(GameMode::Timed),
            "tracking" | "track" => Some(GameMode::Tracking),
            _ => None,
        }
    }

    /// Best-score storage key (versioned)
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameMode::Timed => "bullseye_high_timed_v3",
            GameMode::Tracking => "bullseye_high_tracking_v3",
        }
    }
}

/// Immutable snapshot of the player's choices for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    pub mode: GameMode,
    /// Tracking only
    pub shields_enabled: bool,
    /// 1..=10
    pub difficulty: u8,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Timed,
            shields_enabled: false,
            difficulty: DIFFICULTY_MIN,
        }
    }
}

impl RunSettings {
    /// Build a snapshot, clamping difficulty into 1..=10
    pub fn new(mode: GameMode, shields_enabled: bool, difficulty: u8) -> Self {
        Self {
            mode,
            shields_enabled,
            difficulty: difficulty.clamp(DIFFICULTY_MIN, DIFFICULTY_MAX),
        }
    }

    pub fn timed(difficulty: u8) -> Self {
        Self::new(GameMode::Timed, false, difficulty)
    }

    pub fn tracking(difficulty: u8, shields_enabled: bool) -> Self {
        Self::new(GameMode::Tracking, shields_enabled, difficulty)
    }

    /// Whether Tracking targets spawn with a shield
    pub fn shields_active(&self) -> bool {
        self.mode == GameMode::Tracking && self.shields_enabled
    }

    pub fn difficulty_in_range(&self) -> bool {
        (DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&self.difficulty)
    }
}
