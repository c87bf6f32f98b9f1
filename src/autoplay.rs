//! Autoplayer - a seeded bot that plays a session
//!
//! Used by the headless binary and by the full-length run tests. It picks the
//! oldest live target, waits out a reaction delay, then presses near its
//! center with some aim error (or flubs the press entirely).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::BestScoreStore;
use crate::presentation::PresentationSink;
use crate::session::Session;
use crate::sim::PressResult;

/// Bot reflexes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoplayConfig {
    /// Delay between picking a target and pressing it (ms)
    pub reaction_ms: f64,
    /// Aim scatter as a fraction of the target radius
    pub aim_error: f32,
    /// Chance a press lands on empty arena
    pub miss_rate: f64,
}

impl AutoplayConfig {
    /// Presses dead center as fast as it is allowed to
    pub const PERFECT: Self = Self {
        reaction_ms: 100.0,
        aim_error: 0.0,
        miss_rate: 0.0,
    };

    /// Interpolate reflexes from a 0..=1 skill level
    pub fn from_skill(skill: f32) -> Self {
        let skill = skill.clamp(0.0, 1.0);
        Self {
            reaction_ms: crate::lerp(450.0, 120.0, f64::from(skill)),
            aim_error: 1.2 + (0.2 - 1.2) * skill,
            miss_rate: crate::lerp(0.25, 0.02, f64::from(skill)),
        }
    }
}

/// Press the bot has lined up
#[derive(Debug, Clone, Copy, PartialEq)]
struct Aim {
    target: u32,
    press_at_ms: f64,
}

/// Seeded bot
#[derive(Debug, Clone)]
pub struct Autoplayer {
    config: AutoplayConfig,
    rng: Pcg32,
    aim: Option<Aim>,
}

impl Autoplayer {
    pub fn new(config: AutoplayConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            aim: None,
        }
    }

    pub fn config(&self) -> &AutoplayConfig {
        &self.config
    }

    /// Look at the session after a frame and press if the reaction delay is up
    pub fn act<S, P>(&mut self, session: &mut Session<S, P>, now_ms: f64) -> Option<PressResult>
    where
        S: BestScoreStore,
        P: PresentationSink,
    {
        if !session.is_running() {
            self.aim = None;
            return None;
        }

        let oldest = session.targets().next().map(|t| (t.id, t.pos, t.radius()));
        let Some((id, pos, radius)) = oldest else {
            self.aim = None;
            return None;
        };

        match self.aim {
            Some(aim) if aim.target == id => {
                if now_ms < aim.press_at_ms {
                    return None;
                }
            }
            _ => {
                self.aim = Some(Aim {
                    target: id,
                    press_at_ms: now_ms + self.config.reaction_ms,
                });
                return None;
            }
        }

        // Next press needs a fresh reaction even on the same target
        self.aim = Some(Aim {
            target: id,
            press_at_ms: now_ms + self.config.reaction_ms,
        });

        if self.config.miss_rate > 0.0 && self.rng.random_bool(self.config.miss_rate.min(1.0)) {
            return Some(session.press_empty());
        }

        let scatter = if self.config.aim_error > 0.0 {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let dist = self.rng.random::<f32>() * self.config.aim_error * radius;
            Vec2::from_angle(angle) * dist
        } else {
            Vec2::ZERO
        };
        Some(session.press_at(pos + scatter))
    }
}
