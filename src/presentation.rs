//! Views handed to whatever draws the game
//!
//! The session pushes a `FrameView` every tick and a `RunReport` when a run
//! ends. It never reads anything back from the sink.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::format_seconds;
use crate::highscores::{ScoreRecord, Submission};
use crate::settings::GameMode;
use crate::sim::{RunOutcome, RunStats, Target};

/// Drawable state of one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub pos: Vec2,
    /// Outer diameter
    pub size: f32,
    /// Shield layer visible
    pub shielded: bool,
    /// One hit from breaking its shield or being destroyed
    pub weak: bool,
}

impl From<&Target> for TargetView {
    fn from(target: &Target) -> Self {
        Self {
            id: target.id,
            pos: target.pos,
            size: target.size,
            shielded: target.shielded(),
            weak: target.weak(),
        }
    }
}

/// Everything the HUD and the arena need for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub mode: GameMode,
    pub elapsed_ms: f64,
    pub remaining_ms: f64,
    pub stats: RunStats,
    pub accuracy: f64,
    pub targets: Vec<TargetView>,
}

impl FrameView {
    /// Remaining time readout ("12.3")
    pub fn time_left(&self) -> String {
        format_seconds(self.remaining_ms)
    }
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: GameMode,
    pub outcome: RunOutcome,
    pub record: ScoreRecord,
    pub stats: RunStats,
    /// Ledger verdict; `None` unless the run finished
    pub submission: Option<Submission>,
}

impl RunReport {
    pub fn new_best(&self) -> bool {
        self.submission == Some(Submission::NewBest)
    }
}

/// Receiver for frame and end-of-run views
pub trait PresentationSink {
    fn frame(&mut self, view: &FrameView);
    fn run_ended(&mut self, report: &RunReport);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn frame(&mut self, _view: &FrameView) {}
    fn run_ended(&mut self, _report: &RunReport) {}
}

/// Logs a HUD line every `every` frames and the final report
#[derive(Debug, Clone)]
pub struct LogSink {
    every: u32,
    frames: u32,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(60)
    }
}

impl LogSink {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }
}

impl PresentationSink for LogSink {
    fn frame(&mut self, view: &FrameView) {
        self.frames = self.frames.wrapping_add(1);
        if self.frames % self.every != 0 {
            return;
        }
        log::info!(
            "{} {}s | pts {} | acc {} | outer {} center {} shield {} | misses {} expired {} | live {}",
            view.mode.as_str(),
            view.time_left(),
            view.stats.points,
            crate::format_percent(view.accuracy),
            view.stats.hits_outer,
            view.stats.hits_center,
            view.stats.hits_shield,
            view.stats.click_misses,
            view.stats.expired_misses,
            view.targets.len()
        );
    }

    fn run_ended(&mut self, report: &RunReport) {
        self.frames = 0;
        log::info!(
            "{} run {}: {}{}",
            report.mode.as_str(),
            report.outcome.as_str(),
            report.record.summary(),
            if report.new_best() { " (new best)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_view_flags() {
        let target = Target::tracking(3, Vec2::new(10.0, 20.0), 64.0, Vec2::X, 4, 1);
        let view = TargetView::from(&target);
        assert_eq!(view.id, 3);
        assert_eq!(view.size, 64.0);
        assert!(view.shielded);
        assert!(view.weak);
    }

    #[test]
    fn test_log_sink_handles_zero_interval() {
        let mut sink = LogSink::new(0);
        let view = FrameView {
            mode: GameMode::Timed,
            elapsed_ms: 0.0,
            remaining_ms: 60_000.0,
            stats: RunStats::default(),
            accuracy: 0.0,
            targets: Vec::new(),
        };
        sink.frame(&view);
        assert_eq!(view.time_left(), "60.0");
    }
}
