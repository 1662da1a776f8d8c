//! Clock display background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{state::TimerSnapshot, utils::format_clock};

/// Render one snapshot as a display line, e.g. `01:30 [running]`
pub fn render(snapshot: &TimerSnapshot) -> String {
    format!("{} [{}]", format_clock(snapshot.time), snapshot.state)
}

/// Log the clock every time the countdown changes
///
/// Runs until the controller publishing the snapshots is dropped.
pub async fn display_task(mut updates: watch::Receiver<TimerSnapshot>) {
    info!("Starting display task");
    info!("{}", render(&updates.borrow_and_update()));

    while updates.changed().await.is_ok() {
        let snapshot = *updates.borrow_and_update();
        info!("{}", render(&snapshot));
    }

    debug!("Timer controller gone, display task exiting");
}
