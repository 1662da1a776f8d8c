//! Countdown state machine

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{TimerSnapshot, TimerState};
use crate::{
    error::TimerError,
    tasks::{Subscription, TickResult, TickSource},
};

/// Mutable countdown state guarded by the controller's lock
#[derive(Debug, Default)]
struct Countdown {
    time: u64,
    state: TimerState,
    /// Present iff `state` is `Running`
    subscription: Option<Subscription>,
    /// Bumped on every subscribe/cancel so late ticks can be recognised
    generation: u64,
}

impl Countdown {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.time, self.state)
    }

    fn cancel_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("Tick subscription {} cancelled", self.generation);
        }
        self.generation += 1;
    }
}

/// Owns the countdown and drives it from a tick source
///
/// Every command and every tick goes through one lock, so they never race.
/// Observers get a fresh [`TimerSnapshot`] whenever time or state changes.
pub struct TimerController {
    countdown: Arc<Mutex<Countdown>>,
    source: Arc<dyn TickSource>,
    updates: Arc<watch::Sender<TimerSnapshot>>,
}

impl TimerController {
    /// Create a cleared controller with zero time
    pub fn new(source: Arc<dyn TickSource>) -> Self {
        Self::with_initial_time(source, 0)
    }

    /// Create a cleared controller with time preset to `seconds`
    pub fn with_initial_time(source: Arc<dyn TickSource>, seconds: u64) -> Self {
        let countdown = Countdown {
            time: seconds,
            ..Countdown::default()
        };
        let (updates, _) = watch::channel(countdown.snapshot());

        Self {
            countdown: Arc::new(Mutex::new(countdown)),
            source,
            updates: Arc::new(updates),
        }
    }

    /// Reset time to zero and stop ticking
    pub fn clear(&self) -> Result<TimerSnapshot, TimerError> {
        info!("Clearing timer");
        self.update(|countdown| {
            countdown.cancel_subscription();
            countdown.time = 0;
            countdown.state = TimerState::Cleared;
        })
    }

    /// Start (or resume) counting down
    ///
    /// Any existing subscription is cancelled first, so calling this twice
    /// never leaves two tick streams decrementing the same countdown.
    pub fn start(&self) -> Result<TimerSnapshot, TimerError> {
        let countdown = Arc::downgrade(&self.countdown);
        let updates = Arc::clone(&self.updates);
        let source = Arc::clone(&self.source);

        self.update(move |current| {
            current.cancel_subscription();
            let generation = current.generation;
            let callback = Arc::new(move |result: TickResult| {
                apply_tick(&countdown, &updates, generation, result);
            });
            current.subscription = Some(source.subscribe(callback));
            current.state = TimerState::Running;
            info!("Timer started at {}s", current.time);
        })
    }

    /// Stop ticking, keeping the remaining time
    pub fn pause(&self) -> Result<TimerSnapshot, TimerError> {
        self.update(|countdown| {
            countdown.cancel_subscription();
            countdown.state = TimerState::Paused;
            info!("Timer paused at {}s", countdown.time);
        })
    }

    /// Add or remove `amount` seconds; removal never goes below zero
    ///
    /// Accepted in any state.
    pub fn modify_time(&self, increment: bool, amount: u64) -> Result<TimerSnapshot, TimerError> {
        self.update(|countdown| {
            if increment {
                countdown.time = countdown.time.saturating_add(amount);
            } else if countdown.time > 0 {
                countdown.time = countdown.time.saturating_sub(amount);
            }
            debug!(
                "Time {} by {}s, now {}s",
                if increment { "increased" } else { "decreased" },
                amount,
                countdown.time
            );
        })
    }

    /// Current time and state
    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(lock(&self.countdown)?.snapshot())
    }

    /// Watch for snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.subscribe()
    }

    /// Cancel any live tick subscription; a running countdown ends up paused
    pub fn shutdown(&self) -> Result<TimerSnapshot, TimerError> {
        self.update(|countdown| {
            countdown.cancel_subscription();
            if countdown.state.is_running() {
                countdown.state = TimerState::Paused;
                info!("Timer paused at {}s for shutdown", countdown.time);
            }
        })
    }

    /// Apply a change under the lock and publish the result if it differs
    fn update<F>(&self, updater: F) -> Result<TimerSnapshot, TimerError>
    where
        F: FnOnce(&mut Countdown),
    {
        let mut countdown = lock(&self.countdown)?;
        updater(&mut countdown);
        let snapshot = countdown.snapshot();
        publish(&self.updates, snapshot);
        Ok(snapshot)
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Failed to cancel tick subscription on shutdown: {}", e);
        }
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("snapshot", &self.snapshot().ok())
            .finish()
    }
}

/// Apply one tick from subscription `generation`
fn apply_tick(
    countdown: &Weak<Mutex<Countdown>>,
    updates: &watch::Sender<TimerSnapshot>,
    generation: u64,
    result: TickResult,
) {
    // Controller gone: nothing left to count down
    let Some(shared) = countdown.upgrade() else {
        return;
    };
    let Ok(mut countdown) = lock(&shared) else {
        warn!("Dropping tick: timer state lock poisoned");
        return;
    };
    if countdown.generation != generation || !countdown.state.is_running() {
        debug!("Ignoring tick from cancelled subscription {}", generation);
        return;
    }

    match result {
        Ok(()) => {
            if countdown.time > 0 {
                countdown.time -= 1;
            }
            debug!("Tick: {}s remaining", countdown.time);
        }
        Err(e) => {
            warn!("{}, pausing timer", e);
            countdown.cancel_subscription();
            countdown.state = TimerState::Paused;
        }
    }

    publish(updates, countdown.snapshot());
}

fn publish(updates: &watch::Sender<TimerSnapshot>, snapshot: TimerSnapshot) {
    updates.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    });
}

fn lock(countdown: &Mutex<Countdown>) -> Result<MutexGuard<'_, Countdown>, TimerError> {
    countdown.lock().map_err(|_| TimerError::StatePoisoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{IntervalTickSource, ManualTickSource};
    use std::time::Duration;

    fn controller() -> (ManualTickSource, TimerController) {
        let source = ManualTickSource::new();
        let controller = TimerController::new(Arc::new(source.clone()));
        (source, controller)
    }

    #[test]
    fn starts_cleared() {
        let (source, controller) = controller();
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(0, TimerState::Cleared)
        );
        assert_eq!(source.active_subscriptions(), 0);
    }

    #[test]
    fn modify_time_accumulates() {
        let (_, controller) = controller();
        controller.modify_time(true, 60).unwrap();
        let snapshot = controller.modify_time(true, 1).unwrap();
        assert_eq!(snapshot.time, 61);
        assert_eq!(snapshot.state, TimerState::Cleared);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let (_, controller) = controller();
        controller.modify_time(true, 5).unwrap();
        controller.start().unwrap();
        controller.pause().unwrap();

        let snapshot = controller.modify_time(false, 10).unwrap();
        assert_eq!(snapshot, TimerSnapshot::new(0, TimerState::Paused));

        // Decrement at zero is a no-op
        assert_eq!(controller.modify_time(false, 1).unwrap().time, 0);
    }

    #[test]
    fn increment_saturates() {
        let (_, controller) = controller();
        controller.modify_time(true, u64::MAX).unwrap();
        assert_eq!(controller.modify_time(true, 1).unwrap().time, u64::MAX);
    }

    #[test]
    fn counts_down_to_zero_and_keeps_running() {
        let (source, controller) = controller();
        controller.modify_time(true, 3).unwrap();
        controller.start().unwrap();

        for _ in 0..3 {
            source.tick();
        }
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(0, TimerState::Running)
        );

        source.tick();
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(0, TimerState::Running)
        );
        assert_eq!(source.active_subscriptions(), 1);
    }

    #[test]
    fn double_start_keeps_one_subscription() {
        let (source, controller) = controller();
        controller.modify_time(true, 10).unwrap();
        controller.start().unwrap();
        controller.start().unwrap();

        assert_eq!(source.active_subscriptions(), 1);
        source.tick();
        assert_eq!(controller.snapshot().unwrap().time, 9);
    }

    #[test]
    fn pause_retains_time_and_resume_continues() {
        let (source, controller) = controller();
        controller.modify_time(true, 10).unwrap();
        controller.start().unwrap();
        source.tick();
        source.tick();

        let paused = controller.pause().unwrap();
        assert_eq!(paused, TimerSnapshot::new(8, TimerState::Paused));
        assert_eq!(source.active_subscriptions(), 0);

        source.tick();
        assert_eq!(controller.snapshot().unwrap().time, 8);

        controller.start().unwrap();
        source.tick();
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(7, TimerState::Running)
        );
    }

    #[test]
    fn clear_from_every_state() {
        let (source, controller) = controller();

        controller.modify_time(true, 30).unwrap();
        assert_eq!(
            controller.clear().unwrap(),
            TimerSnapshot::new(0, TimerState::Cleared)
        );

        controller.modify_time(true, 30).unwrap();
        controller.start().unwrap();
        assert_eq!(
            controller.clear().unwrap(),
            TimerSnapshot::new(0, TimerState::Cleared)
        );
        assert_eq!(source.active_subscriptions(), 0);

        controller.modify_time(true, 30).unwrap();
        controller.start().unwrap();
        controller.pause().unwrap();
        assert_eq!(
            controller.clear().unwrap(),
            TimerSnapshot::new(0, TimerState::Cleared)
        );

        controller.modify_time(true, 5).unwrap();
        source.tick();
        assert_eq!(controller.snapshot().unwrap().time, 5);
    }

    #[test]
    fn stale_tick_is_ignored() {
        let source = ManualTickSource::new();
        let controller = TimerController::with_initial_time(Arc::new(source.clone()), 5);

        // Capture the tick callback the way an in-flight delivery would
        // hold it, then cancel the subscription underneath it.
        controller.start().unwrap();
        let generation = lock(&controller.countdown).unwrap().generation;
        controller.clear().unwrap();
        controller.modify_time(true, 5).unwrap();

        apply_tick(
            &Arc::downgrade(&controller.countdown),
            &controller.updates,
            generation,
            Ok(()),
        );
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(5, TimerState::Cleared)
        );
    }

    #[test]
    fn tick_error_pauses() {
        let (source, controller) = controller();
        controller.modify_time(true, 4).unwrap();
        controller.start().unwrap();
        source.tick();

        source.fail("interval broke");
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(3, TimerState::Paused)
        );
        assert_eq!(source.active_subscriptions(), 0);

        controller.start().unwrap();
        source.tick();
        assert_eq!(controller.snapshot().unwrap().time, 2);
    }

    #[test]
    fn shutdown_pauses_running_timer() {
        let (source, controller) = controller();
        controller.modify_time(true, 5).unwrap();
        let mut updates = controller.subscribe();
        controller.start().unwrap();

        let snapshot = controller.shutdown().unwrap();
        assert_eq!(snapshot, TimerSnapshot::new(5, TimerState::Paused));
        assert_eq!(source.active_subscriptions(), 0);
        assert_eq!(*updates.borrow_and_update(), TimerSnapshot::new(5, TimerState::Paused));

        source.tick();
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(5, TimerState::Paused)
        );
    }

    #[test]
    fn shutdown_keeps_stopped_states() {
        let (_, controller) = controller();
        controller.modify_time(true, 7).unwrap();
        assert_eq!(
            controller.shutdown().unwrap(),
            TimerSnapshot::new(7, TimerState::Cleared)
        );

        controller.start().unwrap();
        controller.pause().unwrap();
        assert_eq!(
            controller.shutdown().unwrap(),
            TimerSnapshot::new(7, TimerState::Paused)
        );
    }

    #[test]
    fn drop_releases_subscription() {
        let (source, controller) = controller();
        controller.start().unwrap();
        assert_eq!(source.active_subscriptions(), 1);

        drop(controller);
        assert_eq!(source.active_subscriptions(), 0);
    }

    #[test]
    fn observers_see_changes_only() {
        let (source, controller) = controller();
        let mut updates = controller.subscribe();
        assert!(!updates.has_changed().unwrap());

        controller.modify_time(true, 1).unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), TimerSnapshot::new(1, TimerState::Cleared));

        controller.start().unwrap();
        source.tick();
        assert_eq!(*updates.borrow_and_update(), TimerSnapshot::new(0, TimerState::Running));

        // Ticking at zero changes nothing
        source.tick();
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_source_counts_down_in_real_time() {
        let controller =
            TimerController::with_initial_time(Arc::new(IntervalTickSource::every_second()), 5);
        controller.start().unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(2, TimerState::Running)
        );

        controller.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            controller.snapshot().unwrap(),
            TimerSnapshot::new(2, TimerState::Paused)
        );
    }
}
