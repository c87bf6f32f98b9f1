//! Hit resolution
//!
//! Turns a pointer press into score, damage and shield changes. Each call
//! mutates the run's counters through a single `&mut RunContext`, so one
//! press is never observed half-applied.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{HitZone, classify_hit};
use super::state::RunContext;
use super::target::TargetKind;

/// What a press did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PressResult {
    /// No run, or the target was already gone (expired, destroyed, cleared)
    Ignored,
    /// Press on empty arena
    Miss,
    /// Scored on the target itself
    Hit {
        id: u32,
        zone: HitZone,
        points: u32,
        destroyed: bool,
    },
    /// Absorbed by a Tracking shield
    ShieldHit { id: u32, shield_left: i32 },
}

/// Resolve a press on target `id` using the target's current geometry
pub fn resolve_hit(ctx: &mut RunContext, id: u32, press: Vec2) -> PressResult {
    let Some(target) = ctx.pool.get(id) else {
        return PressResult::Ignored;
    };
    let (center, radius) = (target.pos, target.radius());
    resolve_hit_at(ctx, id, press, center, radius)
}

/// Resolve a press on target `id` against geometry reported by the host at
/// press time (where it was drawn, which may lag the simulation by a frame)
pub fn resolve_hit_at(
    ctx: &mut RunContext,
    id: u32,
    press: Vec2,
    center: Vec2,
    outer_radius: f32,
) -> PressResult {
    if !ctx.is_running() {
        return PressResult::Ignored;
    }
    let zone = classify_hit(press, center, outer_radius, ctx.tuning.center_radius_ratio);

    let Some(target) = ctx.pool.get_mut(id) else {
        return PressResult::Ignored;
    };
    let stats = &mut ctx.stats;

    let result = match &mut target.kind {
        TargetKind::Timed { .. } => {
            // A single press always destroys a Timed target
            PressResult::Hit {
                id,
                zone,
                points: zone.value(),
                destroyed: true,
            }
        }
        TargetKind::Tracking { shield_hp, .. } if *shield_hp > 0 => {
            *shield_hp -= 1;
            stats.hits_shield += 1;
            stats.points += 1;
            if *shield_hp == 0 {
                log::debug!("Target {id} shield broken");
            }
            return PressResult::ShieldHit {
                id,
                shield_left: *shield_hp,
            };
        }
        TargetKind::Tracking { hp, .. } => {
            let damage = zone.value();
            *hp -= damage as i32;
            PressResult::Hit {
                id,
                zone,
                points: damage,
                destroyed: *hp <= 0,
            }
        }
    };

    if let PressResult::Hit {
        zone,
        points,
        destroyed,
        ..
    } = result
    {
        match zone {
            HitZone::Center => stats.hits_center += 1,
            HitZone::Outer => stats.hits_outer += 1,
        }
        stats.points += points;
        if destroyed {
            ctx.pool.remove(id);
        }
    }
    result
}

/// Resolve a press on empty arena
pub fn resolve_miss(ctx: &mut RunContext) -> PressResult {
    if !ctx.is_running() {
        return PressResult::Ignored;
    }
    ctx.stats.click_misses += 1;
    PressResult::Miss
}

/// Resolve a press at an arena point: the topmost target under it, else a
/// miss. Presses outside the arena are ignored.
pub fn resolve_press(ctx: &mut RunContext, point: Vec2) -> PressResult {
    if !ctx.arena.contains(point) {
        return PressResult::Ignored;
    }
    match ctx.pool.hit_test(point) {
        Some(id) => resolve_hit(ctx, id, point),
        None => resolve_miss(ctx),
    }
}
