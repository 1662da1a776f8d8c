//! Background tasks module
//! 
//! This module contains the tick sources that drive the countdown and the
//! task that renders it.

pub mod display;
pub mod tick_source;

// Re-export main types
pub use display::display_task;
pub use tick_source::{
    IntervalTickSource, ManualTickSource, Subscription, TickCallback, TickResult, TickSource,
};
