//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{TimerAction, TimerSnapshot, TimerState},
    utils::format_clock,
};

/// Body of `POST /time`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub increment: bool,
    /// Seconds to add or remove
    pub amount: u64,
}

/// Timer view shared by every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub time: u64,
    /// `MM:SS`
    pub display: String,
    pub state: TimerState,
    /// Controls to offer in the current state
    pub actions: Vec<TimerAction>,
}

impl From<TimerSnapshot> for TimerView {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            time: snapshot.time,
            display: format_clock(snapshot.time),
            state: snapshot.state,
            actions: snapshot.state.available_actions(),
        }
    }
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    /// Create a new API response; `status` mirrors the timer state
    pub fn new(message: impl Into<String>, snapshot: TimerSnapshot) -> Self {
        Self {
            status: snapshot.state.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer: snapshot.into(),
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
