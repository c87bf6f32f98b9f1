//! Target lifecycle simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time arrives from the host as millisecond timestamps
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod curve;
pub mod hit;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod target;
pub mod tick;

pub use collision::{Arena, HitZone, bounce_in_arena, classify_hit};
pub use curve::{Curves, DifficultyCurve};
pub use hit::{PressResult, resolve_hit, resolve_hit_at, resolve_miss, resolve_press};
pub use pool::TargetPool;
pub use spawn::SpawnTimer;
pub use state::{RunContext, RunOutcome, RunPhase, RunStats};
pub use target::{Target, TargetKind};
pub use tick::{fire_spawn, tick, update_timed, update_tracking};
