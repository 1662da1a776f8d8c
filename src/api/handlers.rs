//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::WatchStream;
use tracing::{error, info};

use crate::{
    error::TimerError,
    state::{AppState, TimerController, TimerSnapshot},
    utils::format::{MINUTE_IN_SECONDS, SECOND},
};
use super::responses::{AdjustRequest, HealthResponse, StatusResponse, TimerResponse, TimerView};

/// Run a command against the controller and wrap the outcome
fn respond<F>(
    state: &AppState,
    action: &str,
    message: &str,
    command: F,
) -> Result<Json<TimerResponse>, StatusCode>
where
    F: FnOnce(&TimerController) -> Result<TimerSnapshot, TimerError>,
{
    match state.command(action, command) {
        Ok(snapshot) => Ok(Json(TimerResponse::new(message, snapshot))),
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "start", "Timer running", TimerController::start)
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "pause", "Timer paused", TimerController::pause)
}

/// Handle POST /clear - Reset the countdown to zero
pub async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "clear", "Timer cleared", TimerController::clear)
}

/// Handle POST /time - Add or remove an arbitrary number of seconds
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "adjust", "Time adjusted", |controller| {
        controller.modify_time(request.increment, request.amount)
    })
}

/// Handle POST /time/minute/up
pub async fn minute_up_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "minute-up", "Added one minute", |controller| {
        controller.modify_time(true, MINUTE_IN_SECONDS)
    })
}

/// Handle POST /time/minute/down
pub async fn minute_down_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "minute-down", "Removed one minute", |controller| {
        controller.modify_time(false, MINUTE_IN_SECONDS)
    })
}

/// Handle POST /time/second/up
pub async fn second_up_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "second-up", "Added one second", |controller| {
        controller.modify_time(true, SECOND)
    })
}

/// Handle POST /time/second/down
pub async fn second_down_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    respond(&state, "second-down", "Removed one second", |controller| {
        controller.modify_time(false, SECOND)
    })
}

/// Handle GET /status - Return current timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.controller.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: snapshot.into(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream a `timer` event for every change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    info!("Event stream client connected");

    let events = WatchStream::new(state.controller.subscribe()).map(|snapshot| {
        serde_json::to_string(&TimerView::from(snapshot))
            .map(|data| Event::default().event("timer").data(data))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
