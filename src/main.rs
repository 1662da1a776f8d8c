//! Countdown Server - A countdown timer with start/pause/reset control
//!
//! This is the main entry point for the countdown-server application.

use std::sync::Arc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::info;

use countdown_server::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{display_task, IntervalTickSource},
    utils::{format_clock, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, initial={}, tick={}ms",
          config.host, config.port, format_clock(config.initial_seconds()), config.tick_ms);

    let source = IntervalTickSource::new(config.tick_period(), Handle::current())?;
    info!("Tick source ready with period {:?}", source.period());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Arc::new(source),
        config.initial_seconds(),
    ));

    // Log the clock on every change
    tokio::spawn(display_task(state.controller.subscribe()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start             - Start or resume the countdown");
    info!("  POST /pause             - Pause the countdown");
    info!("  POST /clear             - Reset the countdown to 00:00");
    info!("  POST /time              - Adjust time by {{\"increment\", \"amount\"}}");
    info!("  POST /time/minute/up    - Add one minute (also /down, /time/second/*)");
    info!("  GET  /status            - Current time, state and available actions");
    info!("  GET  /events            - Server-sent timer updates");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("{}", e),
            }
        }
    }

    match state.controller.shutdown() {
        Ok(snapshot) => info!("Timer stopped at {} [{}]", format_clock(snapshot.time), snapshot.state),
        Err(e) => tracing::error!("Failed to stop timer: {}", e),
    }
    info!("Server shutdown complete");
    Ok(())
}
