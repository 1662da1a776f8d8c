//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{TimerController, TimerSnapshot};
use crate::{error::TimerError, tasks::TickSource, utils::format_uptime};

/// Main application state: the countdown plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// The countdown being served
    pub controller: TimerController,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last command tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create a new AppState with a cleared countdown preset to `initial_seconds`
    pub fn new(
        port: u16,
        host: String,
        source: Arc<dyn TickSource>,
        initial_seconds: u64,
    ) -> Self {
        Self {
            controller: TimerController::with_initial_time(source, initial_seconds),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Run a controller command and record it as the last action
    pub fn command<F>(&self, action: &str, command: F) -> Result<TimerSnapshot, TimerError>
    where
        F: FnOnce(&TimerController) -> Result<TimerSnapshot, TimerError>,
    {
        let snapshot = command(&self.controller)?;
        info!("Command '{}' applied: {}s, {}", action, snapshot.time, snapshot.state);

        let mut last_action = self
            .last_action
            .lock()
            .map_err(|_| TimerError::StatePoisoned)?;
        *last_action = Some((action.to_string(), Utc::now()));

        Ok(snapshot)
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}
