//! State management module
//! 
//! This module contains the countdown state machine and the server-wide state
//! that wraps it.

pub mod app_state;
pub mod controller;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use controller::TimerController;
pub use timer_state::{TimerAction, TimerSnapshot, TimerState};
