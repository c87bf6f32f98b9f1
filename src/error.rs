//! Error types for the storage and configuration layers.
//!
//! Nothing in the simulation itself fails: stale input is ignored and timing
//! underflow is clamped. Errors only exist at the edges, where a best-score
//! store or a tuning file is read, and the score ledger swallows store errors
//! after logging them so gameplay never blocks on storage.

use thiserror::Error;

/// Failure reading or writing a best-score store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded
    #[error("store document is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend is not reachable (no window, storage disabled, quota exceeded)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Rejected tuning configuration
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("tuning file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its usable range
    #[error("invalid tuning value `{name}`: {reason}")]
    Invalid {
        name: &'static str,
        reason: &'static str,
    },
}
