//! Frame tick and spawn firing
//!
//! The host drives two clocks into the simulation: a per-frame tick and the
//! spawn timer's deadline. Both return `Some(outcome)` when the run must end;
//! the session performs the actual end transition.

use super::collision::bounce_in_arena;
use super::state::{RunContext, RunOutcome};
use super::target::TargetKind;
use crate::settings::GameMode;

/// Advance the run to host time `now_ms` (one display frame)
pub fn tick(ctx: &mut RunContext, now_ms: f64) -> Option<RunOutcome> {
    if !ctx.is_running() {
        return None;
    }

    if ctx.elapsed_ms(now_ms) >= ctx.tuning.game_ms {
        return Some(RunOutcome::Finished);
    }

    let dt = (((now_ms - ctx.last_tick_ms) / 1000.0).max(0.0) as f32).min(ctx.tuning.max_frame_dt);
    ctx.last_tick_ms = now_ms;

    match ctx.settings.mode {
        GameMode::Timed => update_timed(ctx, now_ms),
        GameMode::Tracking => {
            update_tracking(ctx, dt);
            None
        }
    }
}

/// Shrink Timed targets and expire the ones past their deadline.
/// Stops at the expiry that hits the limit.
pub fn update_timed(ctx: &mut RunContext, now_ms: f64) -> Option<RunOutcome> {
    let lifetime = ctx.tuning.target_lifetime_ms;
    let floor = ctx.tuning.timed_size_floor;
    let limit = ctx.tuning.expired_limit;

    let targets = ctx.pool.targets_mut();
    let mut i = 0;
    while i < targets.len() {
        let target = &mut targets[i];
        target.shrink(now_ms, lifetime, floor);

        if !target.expired(now_ms) {
            i += 1;
            continue;
        }

        let expired = targets.remove(i);
        ctx.stats.expired_misses += 1;
        log::debug!(
            "Target {} expired ({}/{})",
            expired.id,
            ctx.stats.expired_misses,
            limit
        );

        if ctx.stats.expired_misses >= limit {
            return Some(RunOutcome::Overwhelmed);
        }
    }
    None
}

/// Move Tracking targets and bounce them off the arena walls
pub fn update_tracking(ctx: &mut RunContext, dt: f32) {
    let arena = ctx.arena;
    for target in ctx.pool.targets_mut().iter_mut() {
        let radius = target.radius();
        if let TargetKind::Tracking { vel, .. } = &mut target.kind {
            target.pos += *vel * dt;
            bounce_in_arena(&mut target.pos, vel, radius, &arena);
        }
    }
}

/// Fire the spawn timer if its deadline has passed: spawn one target for the
/// current mode, check the Tracking overwhelm rule, then re-arm. A timer
/// firing once the run has reached full length finishes it instead.
pub fn fire_spawn(ctx: &mut RunContext, now_ms: f64) -> Option<RunOutcome> {
    if !ctx.is_running() {
        return None;
    }
    if ctx.elapsed_ms(now_ms) >= ctx.tuning.game_ms {
        ctx.spawn_timer.cancel();
        return Some(RunOutcome::Finished);
    }
    ctx.spawn_timer.fire_if_due(now_ms)?;

    match ctx.settings.mode {
        GameMode::Timed => {
            let id = ctx.pool.spawn_timed(&ctx.arena, &ctx.tuning, now_ms).id;
            log::debug!("Spawned timed target {id}");
        }
        GameMode::Tracking => {
            let shields = ctx.settings.shields_active();
            let id = ctx.pool.spawn_tracking(&ctx.arena, &ctx.tuning, shields).id;
            log::debug!("Spawned tracking target {id} ({} live)", ctx.pool.len());

            if ctx.pool.len() > ctx.tuning.overwhelm_limit {
                return Some(RunOutcome::Overwhelmed);
            }
        }
    }

    let elapsed = ctx.elapsed_ms(now_ms);
    let curve = *ctx.curve();
    ctx.spawn_timer.arm(now_ms, elapsed, &curve);
    None
}
