//! Target entities
//!
//! One target type for both modes; the mode-specific state lives in
//! `TargetKind` and the update step and hit resolver dispatch on it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Mode-specific target state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Shrinks over its lifetime and expires if not clicked
    Timed {
        born_at_ms: f64,
        expires_at_ms: f64,
        start_size: f32,
    },
    /// Bounces around the arena until its hit points run out
    Tracking { vel: Vec2, hp: i32, shield_hp: i32 },
}

/// A live target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Center in arena coordinates
    pub pos: Vec2,
    /// Outer diameter
    pub size: f32,
    pub kind: TargetKind,
}

impl Target {
    pub fn timed(id: u32, pos: Vec2, start_size: f32, born_at_ms: f64, lifetime_ms: f64) -> Self {
        Self {
            id,
            pos,
            size: start_size,
            kind: TargetKind::Timed {
                born_at_ms,
                expires_at_ms: born_at_ms + lifetime_ms,
                start_size,
            },
        }
    }

    pub fn tracking(id: u32, pos: Vec2, size: f32, vel: Vec2, hp: i32, shield_hp: i32) -> Self {
        Self {
            id,
            pos,
            size,
            kind: TargetKind::Tracking { vel, hp, shield_hp },
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Whether a point lies on the target's disc
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius()
    }

    /// Shield layer drawn on top of the bullseye
    pub fn shielded(&self) -> bool {
        matches!(self.kind, TargetKind::Tracking { shield_hp, .. } if shield_hp > 0)
    }

    /// One more hit breaks the shield or destroys the target
    pub fn weak(&self) -> bool {
        match self.kind {
            TargetKind::Tracking { hp, shield_hp, .. } => {
                shield_hp == 1 || (shield_hp <= 0 && hp == 1)
            }
            TargetKind::Timed { .. } => false,
        }
    }

    /// Shrink a Timed target linearly from its start size to `floor` by age.
    /// Returns the shrink progress in `[0, 1]`.
    pub fn shrink(&mut self, now_ms: f64, lifetime_ms: f64, floor: f32) -> f32 {
        let TargetKind::Timed {
            born_at_ms,
            start_size,
            ..
        } = self.kind
        else {
            return 0.0;
        };
        let progress = ((now_ms - born_at_ms) / lifetime_ms).clamp(0.0, 1.0) as f32;
        self.size = (start_size + (floor - start_size) * progress).clamp(floor.min(start_size), start_size);
        progress
    }

    /// Whether a Timed target has reached its deadline
    pub fn expired(&self, now_ms: f64) -> bool {
        matches!(self.kind, TargetKind::Timed { expires_at_ms, .. } if now_ms >= expires_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_shrinks_to_floor() {
        let mut t = Target::timed(1, Vec2::new(100.0, 100.0), 80.0, 1_000.0, 3_000.0);
        assert_eq!(t.shrink(1_000.0, 3_000.0, 20.0), 0.0);
        assert_eq!(t.size, 80.0);

        let progress = t.shrink(2_500.0, 3_000.0, 20.0);
        assert!((progress - 0.5).abs() < 1e-6);
        assert!((t.size - 50.0).abs() < 1e-4);

        t.shrink(9_000.0, 3_000.0, 20.0);
        assert_eq!(t.size, 20.0);
    }

    #[test]
    fn test_shrink_before_birth_keeps_start_size() {
        let mut t = Target::timed(1, Vec2::ZERO, 60.0, 1_000.0, 3_000.0);
        t.shrink(500.0, 3_000.0, 20.0);
        assert_eq!(t.size, 60.0);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let t = Target::timed(1, Vec2::ZERO, 60.0, 0.0, 3_000.0);
        assert!(!t.expired(2_999.9));
        assert!(t.expired(3_000.0));
    }

    #[test]
    fn test_visual_flags() {
        let mut t = Target::tracking(1, Vec2::ZERO, 60.0, Vec2::X, 4, 2);
        assert!(t.shielded());
        assert!(!t.weak());

        t.kind = TargetKind::Tracking { vel: Vec2::X, hp: 4, shield_hp: 1 };
        assert!(t.weak());

        t.kind = TargetKind::Tracking { vel: Vec2::X, hp: 1, shield_hp: 0 };
        assert!(!t.shielded());
        assert!(t.weak());

        let timed = Target::timed(2, Vec2::ZERO, 60.0, 0.0, 3_000.0);
        assert!(!timed.shielded());
        assert!(!timed.weak());
    }

    #[test]
    fn test_contains_uses_radius() {
        let t = Target::tracking(1, Vec2::new(50.0, 50.0), 40.0, Vec2::ZERO, 4, 0);
        assert!(t.contains(Vec2::new(70.0, 50.0)));
        assert!(!t.contains(Vec2::new(70.1, 50.0)));
    }
}
