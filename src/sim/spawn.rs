//! Spawn scheduling
//!
//! The spawn timer is a one-shot deadline re-armed after every firing, with a
//! delay re-sampled from the difficulty curve each time so spawns accelerate
//! continuously through the run.

use super::curve::DifficultyCurve;

/// Cancellable one-shot spawn timer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnTimer {
    due_at_ms: Option<f64>,
}

impl SpawnTimer {
    /// Arm the timer from `now_ms` using the curve at `elapsed_ms` into the run.
    /// Returns the deadline.
    pub fn arm(&mut self, now_ms: f64, elapsed_ms: f64, curve: &DifficultyCurve) -> f64 {
        let delay = curve.delay_ms(elapsed_ms.max(0.0) / 1000.0).max(0.0);
        let due = now_ms + delay;
        self.due_at_ms = Some(due);
        due
    }

    /// Disarm; a cancelled timer never fires
    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    pub fn due_at(&self) -> Option<f64> {
        self.due_at_ms
    }

    pub fn is_armed(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Consume the deadline if it has passed, returning it
    pub fn fire_if_due(&mut self, now_ms: f64) -> Option<f64> {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                Some(due)
            }
            _ => None,
        }
    }
}
