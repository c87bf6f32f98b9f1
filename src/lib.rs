//! Bullseye - an aim trainer with Timed and Tracking modes
//!
//! Core modules:
//! - `sim`: Target lifecycle simulation (spawning, aging, motion, hit resolution)
//! - `session`: Run controller state machine driving `sim`
//! - `highscores`: Best-score ledger over an abstract key-value store
//! - `presentation`: Per-frame and end-of-run views for whatever renders the game
//! - `platform`: Browser/native differences (clock, logging)
//! - `tuning`: Data-driven game balance

pub mod autoplay;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod presentation;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::StoreError;
pub use highscores::{BestScoreStore, MemoryStore, ScoreLedger, ScoreRecord};
pub use presentation::{FrameView, LogSink, NullSink, PresentationSink, RunReport};
pub use session::Session;
pub use settings::{GameMode, RunSettings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Length of a full run (ms)
    pub const GAME_MS: f64 = 60_000.0;

    /// Timed targets shrink for this long, then expire (ms)
    pub const TARGET_LIFETIME_MS: f64 = 3_000.0;
    /// Expirations that end a Timed run
    pub const EXPIRED_LIMIT: u32 = 5;

    /// Center zone radius as a fraction of the outer radius
    pub const CENTER_RADIUS_RATIO: f32 = 0.4;

    /// Timed target sizes (outer diameter, px)
    pub const TARGET_START_SIZE_MIN: u32 = 58;
    pub const TARGET_START_SIZE_MAX: u32 = 84;
    pub const TARGET_MIN_SIZE: f32 = 20.0;

    /// Tracking target sizes (outer diameter, px)
    pub const TRACKING_SIZE_MIN: u32 = 58;
    pub const TRACKING_SIZE_MAX: u32 = 84;
    /// Tracking speed range (px/s)
    pub const TRACKING_SPEED_MIN: u32 = 80;
    pub const TRACKING_SPEED_MAX: u32 = 150;

    /// Tracking health pools
    pub const TRACKING_TARGET_HP: i32 = 4;
    pub const TRACKING_SHIELD_HP: i32 = 2;
    /// More live targets than this after a spawn ends a Tracking run
    pub const TRACKING_OVERWHELM_LIMIT: usize = 5;

    /// Extra spawn margin beyond the target radius (px)
    pub const SPAWN_PADDING: f32 = 4.0;

    /// Largest frame delta fed to motion integration (s)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena dimensions (px)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Accuracy as a percentage string ("87.5%")
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Remaining time as seconds with one decimal, never negative
pub fn format_seconds(ms: f64) -> String {
    format!("{:.1}", (ms / 1000.0).max(0.0))
}
