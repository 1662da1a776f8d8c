//! Countdown Server - A countdown timer with start/pause/reset control
//! 
//! This library provides a tick-driven countdown state machine
//! (cleared, running, paused), the tick sources that drive it, and an HTTP
//! API that exposes its commands and state.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{TickError, TimerError};
pub use state::{AppState, TimerController, TimerSnapshot, TimerState};
pub use api::create_router;
pub use tasks::{IntervalTickSource, ManualTickSource, TickSource};
pub use utils::signals::shutdown_signal;
