//! Target pool
//!
//! Owns every live target of a run. Spawning draws from a seeded PCG stream so
//! a run is reproducible from its seed and the host's event timeline.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Arena;
use super::target::Target;
use crate::tuning::Tuning;

/// Live targets, in spawn order (last = topmost)
#[derive(Debug, Clone)]
pub struct TargetPool {
    targets: Vec<Target>,
    rng: Pcg32,
    next_id: u32,
}

impl TargetPool {
    pub fn new(seed: u64) -> Self {
        Self {
            targets: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reseed the spawn stream (a new run)
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Uniform integer position keeping a disc of `size` fully on the arena
    fn random_position(&mut self, arena: &Arena, size: f32, padding: f32) -> Vec2 {
        let pad = size / 2.0 + padding;
        let center = arena.center();
        let x = match Arena::spawn_span(arena.width, pad) {
            Some((lo, hi)) => self.rng.random_range(lo..=hi) as f32,
            None => center.x,
        };
        let y = match Arena::spawn_span(arena.height, pad) {
            Some((lo, hi)) => self.rng.random_range(lo..=hi) as f32,
            None => center.y,
        };
        Vec2::new(x, y)
    }

    /// Spawn a shrinking Timed target born at `now_ms`
    pub fn spawn_timed(&mut self, arena: &Arena, tuning: &Tuning, now_ms: f64) -> &Target {
        let start_size = self
            .rng
            .random_range(tuning.timed_size_min..=tuning.timed_size_max) as f32;
        let pos = self.random_position(arena, start_size, tuning.spawn_padding);
        let id = self.next_entity_id();

        self.push(Target::timed(
            id,
            pos,
            start_size,
            now_ms,
            tuning.target_lifetime_ms,
        ))
    }

    /// Spawn a moving Tracking target, shielded if `shields` is set
    pub fn spawn_tracking(&mut self, arena: &Arena, tuning: &Tuning, shields: bool) -> &Target {
        let size = self
            .rng
            .random_range(tuning.tracking_size_min..=tuning.tracking_size_max)
            as f32;
        let pos = self.random_position(arena, size, tuning.spawn_padding);

        let speed = self
            .rng
            .random_range(tuning.tracking_speed_min..=tuning.tracking_speed_max)
            as f32;
        let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
        let vel = Vec2::from_angle(angle) * speed;

        let shield_hp = if shields { tuning.tracking_shield_hp } else { 0 };
        let id = self.next_entity_id();

        self.push(Target::tracking(
            id,
            pos,
            size,
            vel,
            tuning.tracking_hp,
            shield_hp,
        ))
    }

    /// Insert an already-built target (tests and scripted scenarios)
    pub fn push(&mut self, target: Target) -> &Target {
        if target.id >= self.next_id {
            self.next_id = target.id.wrapping_add(1).max(1);
        }
        self.targets.push(target);
        &self.targets[self.targets.len() - 1]
    }

    /// Remove a target; absent ids are a no-op
    pub fn remove(&mut self, id: u32) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn get(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Mutable access for the update step and hit resolver
    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn targets_mut(&mut self) -> &mut Vec<Target> {
        &mut self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Topmost target under a point
    pub fn hit_test(&self, point: Vec2) -> Option<u32> {
        self.targets
            .iter()
            .rev()
            .find(|t| t.contains(point))
            .map(|t| t.id)
    }
}
