//! Error types shared across the crate

use thiserror::Error;

/// Errors raised around the countdown state machine
///
/// The state machine itself is total; these cover the plumbing around it.
#[derive(Debug, Error)]
pub enum TimerError {
    /// The controller's state lock was poisoned by a panicking holder
    #[error("timer state lock poisoned")]
    StatePoisoned,

    /// A tick source was configured with a zero period
    #[error("tick period must be greater than zero")]
    InvalidPeriod,

    /// The OS signal handler could not be installed
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] std::io::Error),
}

/// Failure reported by a tick source in place of a tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tick source failed: {reason}")]
pub struct TickError {
    pub reason: String,
}

impl TickError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
