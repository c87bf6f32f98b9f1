//! Arena geometry: hit zones, wall bounces and spawn margins
//!
//! The arena is an axis-aligned rectangle with its origin at the top-left
//! corner, the same space the pointer coordinates arrive in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Playfield dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Inclusive integer range a target center may occupy on one axis, or
    /// `None` if the axis is too short for the margin
    pub fn spawn_span(extent: f32, pad: f32) -> Option<(i32, i32)> {
        let lo = pad.floor() as i32;
        let hi = (extent - pad).floor() as i32;
        (lo <= hi).then_some((lo, hi))
    }
}

/// Where on a target a press landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitZone {
    Center,
    Outer,
}

impl HitZone {
    /// Points (and Tracking damage) for a hit in this zone
    pub fn value(&self) -> u32 {
        match self {
            HitZone::Center => 2,
            HitZone::Outer => 1,
        }
    }
}

/// Classify a press by its distance from the target center
pub fn classify_hit(press: Vec2, center: Vec2, outer_radius: f32, center_ratio: f32) -> HitZone {
    if press.distance(center) <= outer_radius * center_ratio {
        HitZone::Center
    } else {
        HitZone::Outer
    }
}

/// Which walls a moving disc touched this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallBounce {
    pub x: bool,
    pub y: bool,
}

/// Keep a disc of `radius` inside the arena, reflecting velocity off each
/// wall it crossed. Axes are handled independently, so a corner reflects both.
pub fn bounce_in_arena(pos: &mut Vec2, vel: &mut Vec2, radius: f32, arena: &Arena) -> WallBounce {
    let mut bounce = WallBounce::default();

    if pos.x < radius {
        pos.x = radius;
        vel.x = -vel.x;
        bounce.x = true;
    } else if pos.x > arena.width - radius {
        pos.x = arena.width - radius;
        vel.x = -vel.x;
        bounce.x = true;
    }

    if pos.y < radius {
        pos.y = radius;
        vel.y = -vel.y;
        bounce.y = true;
    } else if pos.y > arena.height - radius {
        pos.y = arena.height - radius;
        vel.y = -vel.y;
        bounce.y = true;
    }

    bounce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_boundary_is_inclusive() {
        let center = Vec2::new(100.0, 100.0);
        // radius 25 -> center zone radius 10
        assert_eq!(
            classify_hit(Vec2::new(110.0, 100.0), center, 25.0, 0.4),
            HitZone::Center
        );
        assert_eq!(
            classify_hit(Vec2::new(110.5, 100.0), center, 25.0, 0.4),
            HitZone::Outer
        );
        assert_eq!(classify_hit(center, center, 25.0, 0.4), HitZone::Center);
    }

    #[test]
    fn test_bounce_off_right_wall() {
        let arena = Arena::new(200.0, 100.0);
        let mut pos = Vec2::new(195.0, 50.0);
        let mut vel = Vec2::new(100.0, 30.0);

        let bounce = bounce_in_arena(&mut pos, &mut vel, 10.0, &arena);
        assert_eq!(bounce, WallBounce { x: true, y: false });
        assert_eq!(pos, Vec2::new(190.0, 50.0));
        assert_eq!(vel, Vec2::new(-100.0, 30.0));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let arena = Arena::new(200.0, 100.0);
        let mut pos = Vec2::new(-3.0, 104.0);
        let mut vel = Vec2::new(-50.0, 80.0);

        let bounce = bounce_in_arena(&mut pos, &mut vel, 10.0, &arena);
        assert_eq!(bounce, WallBounce { x: true, y: true });
        assert_eq!(pos, Vec2::new(10.0, 90.0));
        assert_eq!(vel, Vec2::new(50.0, -80.0));
    }

    #[test]
    fn test_inside_is_untouched() {
        let arena = Arena::new(200.0, 100.0);
        let mut pos = Vec2::new(100.0, 50.0);
        let mut vel = Vec2::new(5.0, 5.0);
        assert_eq!(
            bounce_in_arena(&mut pos, &mut vel, 10.0, &arena),
            WallBounce::default()
        );
        assert_eq!(vel, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_spawn_span() {
        assert_eq!(Arena::spawn_span(200.0, 33.0), Some((33, 167)));
        assert_eq!(Arena::spawn_span(50.0, 33.0), None);
    }
}
