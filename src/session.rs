//! Run controller
//!
//! Idle -> Running -> Idle state machine over a `RunContext`. The host feeds
//! it three event sources: display frames, the spawn timer deadline and
//! pointer presses. All three take `&mut self`, so they are serialized by
//! construction; a host sharing a session across threads wraps it in a
//! `Mutex`.
//!
//! Ending a run cancels the spawn timer and leaves `Running` before anything
//! else happens, so late frames, timers or presses after the end are no-ops.

use glam::Vec2;

use crate::highscores::{BestScoreStore, ScoreLedger, ScoreRecord};
use crate::platform;
use crate::presentation::{FrameView, NullSink, PresentationSink, RunReport, TargetView};
use crate::settings::{GameMode, RunSettings};
use crate::sim::{self, Arena, Curves, PressResult, RunContext, RunOutcome, RunPhase, RunStats, Target};
use crate::tuning::Tuning;

/// One player's sequence of runs against a best-score store
pub struct Session<S: BestScoreStore, P: PresentationSink = NullSink> {
    ctx: RunContext,
    ledger: ScoreLedger<S>,
    sink: P,
    /// Runs started so far (mixed into each run's spawn seed)
    runs: u64,
    last_report: Option<RunReport>,
}

impl<S: BestScoreStore> Session<S, NullSink> {
    /// Session with default tuning and arena that presents nothing
    pub fn new(store: S) -> Self {
        Self::with_sink(store, NullSink)
    }
}

impl<S: BestScoreStore, P: PresentationSink> Session<S, P> {
    pub fn with_sink(store: S, sink: P) -> Self {
        Self {
            ctx: RunContext::new(Tuning::default(), Arena::default(), 0),
            ledger: ScoreLedger::new(store),
            sink,
            runs: 0,
            last_report: None,
        }
    }

    /// Replace the balance sheet (takes effect at the next start)
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.ctx.tuning = tuning;
        self
    }

    pub fn with_arena(mut self, arena: Arena) -> Self {
        self.ctx.arena = arena;
        self
    }

    /// Base seed for spawn positions, sizes and velocities
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ctx.seed = seed;
        self
    }

    /// Arena was resized by the host; live targets are kept where they are
    pub fn resize(&mut self, arena: Arena) {
        self.ctx.arena = arena;
    }

    // === Read access ===

    pub fn phase(&self) -> RunPhase {
        self.ctx.phase
    }

    pub fn is_running(&self) -> bool {
        self.ctx.is_running()
    }

    pub fn settings(&self) -> &RunSettings {
        &self.ctx.settings
    }

    pub fn stats(&self) -> &RunStats {
        &self.ctx.stats
    }

    pub fn curves(&self) -> &Curves {
        &self.ctx.curves
    }

    pub fn arena(&self) -> &Arena {
        &self.ctx.arena
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.ctx.pool.iter()
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Host time of the pending spawn, if one is armed
    pub fn next_spawn_at(&self) -> Option<f64> {
        self.ctx.spawn_timer.due_at()
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        self.ctx.remaining_ms(now_ms)
    }

    pub fn best(&self, mode: GameMode) -> Option<ScoreRecord> {
        self.ledger.best(mode)
    }

    pub fn ledger(&self) -> &ScoreLedger<S> {
        &self.ledger
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    // === Transitions ===

    /// Begin a run at host time `now_ms`. A run already in progress is
    /// aborted first.
    pub fn start(&mut self, settings: RunSettings, now_ms: f64) {
        debug_assert!(
            settings.difficulty_in_range(),
            "difficulty {} outside 1..=10",
            settings.difficulty
        );
        if self.ctx.is_running() {
            self.end(RunOutcome::Aborted, now_ms);
        }
        let settings = RunSettings::new(settings.mode, settings.shields_enabled, settings.difficulty);

        self.ctx.settings = settings;
        self.ctx.curves = Curves::for_difficulty(&self.ctx.tuning, settings.difficulty);
        self.ctx.stats.reset();
        self.ctx.pool.clear();
        self.ctx.pool.reseed(self.ctx.seed.wrapping_add(self.runs));
        self.runs += 1;

        self.ctx.start_ms = now_ms;
        self.ctx.last_tick_ms = now_ms;
        self.ctx.phase = RunPhase::Running;

        let curve = *self.ctx.curve();
        let due = self.ctx.spawn_timer.arm(now_ms, 0.0, &curve);

        log::info!(
            "{} run started (difficulty {}, shields {}), first spawn in {}ms",
            settings.mode.as_str(),
            settings.difficulty,
            settings.shields_active(),
            due - now_ms
        );
    }

    /// Abort the current run (if any) and start a fresh one.
    /// Returns the aborted run's report.
    pub fn restart(&mut self, settings: RunSettings, now_ms: f64) -> Option<RunReport> {
        let aborted = self
            .ctx
            .is_running()
            .then(|| self.end(RunOutcome::Aborted, now_ms));
        self.start(settings, now_ms);
        aborted
    }

    /// Display frame at host time `now_ms`. Returns the report if the run
    /// ended on this frame.
    pub fn frame(&mut self, now_ms: f64) -> Option<RunReport> {
        if !self.ctx.is_running() {
            return None;
        }
        if let Some(outcome) = sim::tick(&mut self.ctx, now_ms) {
            return Some(self.end(outcome, now_ms));
        }
        let view = self.frame_view(now_ms);
        self.sink.frame(&view);
        None
    }

    /// Spawn timer callback at host time `now_ms`
    pub fn fire_spawn(&mut self, now_ms: f64) -> Option<RunReport> {
        let outcome = sim::fire_spawn(&mut self.ctx, now_ms)?;
        Some(self.end(outcome, now_ms))
    }

    /// Drive both clocks up to `now_ms`: every spawn deadline that has passed
    /// fires at its own time (none at or past the end of the run), then one
    /// frame runs at `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> Option<RunReport> {
        while self.ctx.is_running() {
            let Some(due) = self.ctx.spawn_timer.due_at() else {
                break;
            };
            if due > now_ms || due >= self.ctx.end_deadline_ms() {
                break;
            }
            if let Some(report) = self.fire_spawn(due) {
                return Some(report);
            }
        }
        self.frame(now_ms)
    }

    // === Input ===

    /// Press on a target the host hit-tested itself
    pub fn press_target(&mut self, id: u32, point: Vec2) -> PressResult {
        sim::resolve_hit(&mut self.ctx, id, point)
    }

    /// Press on a target, classified against the geometry the host drew
    pub fn press_target_at(
        &mut self,
        id: u32,
        point: Vec2,
        center: Vec2,
        outer_radius: f32,
    ) -> PressResult {
        sim::resolve_hit_at(&mut self.ctx, id, point, center, outer_radius)
    }

    /// Press on empty arena
    pub fn press_empty(&mut self) -> PressResult {
        sim::resolve_miss(&mut self.ctx)
    }

    /// Press at an arena point; the session hit-tests live targets
    pub fn press_at(&mut self, point: Vec2) -> PressResult {
        sim::resolve_press(&mut self.ctx, point)
    }

    /// Current HUD and arena state
    pub fn frame_view(&self, now_ms: f64) -> FrameView {
        FrameView {
            mode: self.ctx.settings.mode,
            elapsed_ms: if self.ctx.is_running() {
                self.ctx.elapsed_ms(now_ms)
            } else {
                0.0
            },
            remaining_ms: self.ctx.remaining_ms(now_ms),
            stats: self.ctx.stats,
            accuracy: self.ctx.stats.accuracy(),
            targets: self.ctx.pool.iter().map(TargetView::from).collect(),
        }
    }

    /// End transition: stop the clocks, tear down, score, then notify
    fn end(&mut self, outcome: RunOutcome, now_ms: f64) -> RunReport {
        self.ctx.spawn_timer.cancel();
        self.ctx.phase = RunPhase::Idle;
        self.ctx.pool.clear();

        let mode = self.ctx.settings.mode;
        let stats = self.ctx.stats;
        let record = ScoreRecord::from_stats(&stats, platform::unix_time_ms());

        let submission = outcome
            .records_score()
            .then(|| self.ledger.submit(mode, &record));

        log::info!(
            "{} run {} after {:.1}s: {} (expired {}, shield hits {})",
            mode.as_str(),
            outcome.as_str(),
            self.ctx.elapsed_ms(now_ms) / 1000.0,
            record.summary(),
            stats.expired_misses,
            stats.hits_shield
        );

        let report = RunReport {
            mode,
            outcome,
            record,
            stats,
            submission,
        };
        self.sink.run_ended(&report);
        self.last_report = Some(report.clone());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, Submission};

    /// Sink that keeps everything it is given
    #[derive(Default)]
    struct Recorder {
        frames: Vec<FrameView>,
        reports: Vec<RunReport>,
    }

    impl PresentationSink for Recorder {
        fn frame(&mut self, view: &FrameView) {
            self.frames.push(view.clone());
        }

        fn run_ended(&mut self, report: &RunReport) {
            self.reports.push(report.clone());
        }
    }

    fn session() -> Session<MemoryStore, Recorder> {
        Session::with_sink(MemoryStore::new(), Recorder::default()).with_seed(17)
    }

    #[test]
    fn test_start_arms_first_spawn() {
        let mut s = session();
        assert_eq!(s.phase(), RunPhase::Idle);

        s.start(RunSettings::timed(1), 1_000.0);
        assert!(s.is_running());
        assert_eq!(s.next_spawn_at(), Some(3_000.0));
        assert_eq!(s.targets().count(), 0);

        assert_eq!(s.advance(2_999.0), None);
        assert_eq!(s.targets().count(), 0);
        assert_eq!(s.advance(3_000.0), None);
        assert_eq!(s.targets().count(), 1);
        assert_eq!(s.sink().frames.len(), 2);
    }

    #[test]
    fn test_finish_persists_record() {
        let mut s = session();
        s.start(RunSettings::timed(1), 0.0);
        s.advance(2_000.0);
        let id = s.targets().next().unwrap().id;
        let center = s.targets().next().unwrap().pos;
        s.press_target(id, center);

        let report = s.frame(60_000.0).expect("run should finish");
        assert_eq!(report.outcome, RunOutcome::Finished);
        assert_eq!(report.record.points, 2);
        assert_eq!(report.record.accuracy, 1.0);
        assert_eq!(report.submission, Some(Submission::NewBest));
        assert_eq!(s.best(GameMode::Timed).map(|r| r.points), Some(2));
        assert_eq!(s.best(GameMode::Tracking), None);
        assert_eq!(s.targets().count(), 0);
        assert_eq!(s.next_spawn_at(), None);
        assert_eq!(s.sink().reports.len(), 1);
    }

    #[test]
    fn test_overwhelmed_never_persists() {
        let mut s = session();
        s.start(RunSettings::tracking(10, false), 0.0);

        // Rack up points on the first target so the run would be a best
        s.advance(2_000.0);
        let id = s.targets().next().unwrap().id;
        let pos = s.targets().next().unwrap().pos;
        s.press_target(id, pos);
        assert_eq!(s.stats().points, 2);

        let mut now = 2_000.0;
        let report = loop {
            now += 50.0;
            if let Some(report) = s.advance(now) {
                break report;
            }
            assert!(now < 60_000.0, "tracking run never overwhelmed");
        };
        assert_eq!(report.outcome, RunOutcome::Overwhelmed);
        assert_eq!(report.submission, None);
        assert_eq!(s.best(GameMode::Tracking), None);
        assert!(!s.is_running());
        assert_eq!(s.targets().count(), 0);
    }

    #[test]
    fn test_restart_resets_before_first_spawn() {
        let mut s = session();
        s.start(RunSettings::timed(5), 0.0);
        s.advance(5_000.0);
        s.press_empty();
        assert!(s.targets().count() > 0);
        assert_eq!(s.stats().click_misses, 1);

        let aborted = s.restart(RunSettings::tracking(5, true), 5_000.0).unwrap();
        assert_eq!(aborted.outcome, RunOutcome::Aborted);
        assert_eq!(aborted.submission, None);
        assert_eq!(aborted.stats.click_misses, 1);

        assert!(s.is_running());
        assert_eq!(s.targets().count(), 0);
        assert_eq!(*s.stats(), RunStats::default());
        assert_eq!(s.settings().mode, GameMode::Tracking);
        assert!(s.next_spawn_at().unwrap() > 5_000.0);
        assert_eq!(s.best(GameMode::Timed), None);
    }

    #[test]
    fn test_restart_when_idle_reports_nothing() {
        let mut s = session();
        assert!(s.restart(RunSettings::timed(1), 0.0).is_none());
        assert!(s.is_running());
    }

    #[test]
    fn test_events_after_end_are_noops() {
        let mut s = session();
        s.start(RunSettings::timed(1), 0.0);
        s.advance(2_500.0);
        let target = s.targets().next().unwrap().clone();

        s.frame(60_000.0).unwrap();
        let stats = *s.stats();

        assert_eq!(s.fire_spawn(100_000.0), None);
        assert_eq!(s.advance(100_000.0), None);
        assert_eq!(s.press_target(target.id, target.pos), PressResult::Ignored);
        assert_eq!(s.press_empty(), PressResult::Ignored);
        assert_eq!(*s.stats(), stats);
        assert_eq!(s.targets().count(), 0);
    }

    #[test]
    fn test_expired_target_cannot_be_hit() {
        let mut s = session();
        s.start(RunSettings::timed(1), 0.0);
        s.advance(2_000.0);
        let target = s.targets().next().unwrap().clone();

        // Frame at the deadline expires it before the press arrives
        s.frame(5_000.0);
        assert_eq!(s.stats().expired_misses, 1);
        assert_eq!(s.press_target(target.id, target.pos), PressResult::Ignored);
        assert_eq!(s.stats().points, 0);
    }

    #[test]
    fn test_advance_does_not_spawn_past_run_end() {
        // A second live target would overwhelm; the second deadline lands
        // after the five second run is over
        let tuning = Tuning {
            game_ms: 5_000.0,
            overwhelm_limit: 1,
            ..Tuning::default()
        };
        let mut s = session().with_tuning(tuning);
        s.start(RunSettings::tracking(1, false), 0.0);

        assert_eq!(s.advance(4_999.0), None);
        assert_eq!(s.targets().count(), 1);
        assert!(s.next_spawn_at().unwrap() > 5_000.0);

        let report = s.advance(6_000.0).unwrap();
        assert_eq!(report.outcome, RunOutcome::Finished);
        assert_eq!(report.submission, Some(Submission::NewBest));
    }

    #[test]
    fn test_spawn_timer_after_run_end_finishes() {
        // Host timer fires past the five second mark before any frame does
        let tuning = Tuning {
            game_ms: 5_000.0,
            overwhelm_limit: 1,
            ..Tuning::default()
        };
        let mut s = session().with_tuning(tuning);
        s.start(RunSettings::tracking(1, false), 0.0);
        assert_eq!(s.advance(4_999.0), None);
        assert_eq!(s.targets().count(), 1);

        let due = s.next_spawn_at().unwrap();
        let report = s.fire_spawn(due).unwrap();
        assert_eq!(report.outcome, RunOutcome::Finished);
        assert_eq!(report.submission, Some(Submission::NewBest));
        assert!(s.best(GameMode::Tracking).is_some());
        assert_eq!(s.next_spawn_at(), None);
        assert_eq!(s.sink().reports.len(), 1);
    }

    #[test]
    fn test_press_outside_arena_is_not_a_miss() {
        let mut s = session();
        s.start(RunSettings::timed(1), 0.0);
        assert_eq!(s.press_at(Vec2::new(-500.0, -500.0)), PressResult::Ignored);
        assert_eq!(s.stats().click_misses, 0);
        let center = s.arena().center();
        assert_eq!(s.press_at(center), PressResult::Miss);
        assert_eq!(s.stats().click_misses, 1);
    }

    #[test]
    #[should_panic(expected = "outside 1..=10")]
    fn test_out_of_range_difficulty_is_contract_violation() {
        let mut s = session();
        let settings = RunSettings {
            difficulty: 0,
            ..RunSettings::default()
        };
        s.start(settings, 0.0);
    }
}
