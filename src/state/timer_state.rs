//! Timer state structure and management

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Time reset to zero, no tick subscription
    #[default]
    Cleared,
    /// Tick subscription active
    Running,
    /// Time retained, no tick subscription
    Paused,
}

impl TimerState {
    /// Check if the countdown is ticking
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Controls a presentation layer should offer in this state
    pub fn available_actions(&self) -> Vec<TimerAction> {
        match self {
            Self::Cleared => vec![TimerAction::Start, TimerAction::AdjustTime],
            Self::Running => vec![TimerAction::Pause],
            Self::Paused => vec![
                TimerAction::Resume,
                TimerAction::Reset,
                TimerAction::AdjustTime,
            ],
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cleared => "cleared",
            Self::Running => "running",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// User-facing controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Reset,
    AdjustTime,
}

/// Point-in-time view of the countdown published to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Remaining time in whole seconds
    pub time: u64,
    pub state: TimerState,
}

impl TimerSnapshot {
    pub fn new(time: u64, state: TimerState) -> Self {
        Self { time, state }
    }
}
