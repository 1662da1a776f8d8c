//! Periodic tick sources driving the countdown

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use tokio::{
    runtime::Handle,
    time::{interval_at, Instant},
};
use tracing::debug;

use crate::error::{TickError, TimerError};

/// Outcome of one tick: an elapsed period, or a source failure
pub type TickResult = Result<(), TickError>;

/// Callback invoked once per tick
pub type TickCallback = Arc<dyn Fn(TickResult) + Send + Sync>;

/// A periodic emitter that delivers ticks to a callback until cancelled
pub trait TickSource: Send + Sync {
    /// Begin delivering ticks to `on_tick`. Ticks stop once the returned
    /// subscription is cancelled or dropped.
    fn subscribe(&self, on_tick: TickCallback) -> Subscription;
}

/// Cancellation handle for one live tick stream
///
/// Cancelling is synchronous and idempotent. Dropping the handle cancels.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Tick source backed by a Tokio interval
///
/// Each subscription spawns its own task on the given runtime. The first tick
/// arrives one period after subscribing.
#[derive(Debug, Clone)]
pub struct IntervalTickSource {
    period: Duration,
    handle: Handle,
}

impl IntervalTickSource {
    pub fn new(period: Duration, handle: Handle) -> Result<Self, TimerError> {
        if period.is_zero() {
            return Err(TimerError::InvalidPeriod);
        }
        Ok(Self { period, handle })
    }

    /// One tick per second on the current runtime
    #[cfg(test)]
    pub(crate) fn every_second() -> Self {
        Self::new(Duration::from_secs(1), Handle::current())
            .expect("one second is a valid period")
    }

    /// Time between ticks
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTickSource {
    fn subscribe(&self, on_tick: TickCallback) -> Subscription {
        let period = self.period;
        let task = self.handle.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                on_tick(Ok(()));
            }
        });
        debug!("Interval tick task spawned with period {:?}", period);

        Subscription::new(move || task.abort())
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: HashMap<u64, TickCallback>,
}

/// Tick source driven by hand
///
/// Nothing happens until [`tick`](Self::tick) or [`fail`](Self::fail) is
/// called, which makes countdown behavior deterministic for tests and for
/// embedders that own their own clock.
#[derive(Clone, Default)]
pub struct ManualTickSource {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one successful tick to every live subscriber
    pub fn tick(&self) {
        self.emit(Ok(()));
    }

    /// Deliver a failure to every live subscriber
    pub fn fail(&self, reason: impl Into<String>) {
        self.emit(Err(TickError::new(reason)));
    }

    /// Number of subscriptions that have not been cancelled
    pub fn active_subscriptions(&self) -> usize {
        lock(&self.subscribers).callbacks.len()
    }

    fn emit(&self, result: TickResult) {
        // Callbacks may cancel subscriptions, so they run without the lock held
        let callbacks: Vec<TickCallback> =
            lock(&self.subscribers).callbacks.values().cloned().collect();
        for callback in callbacks {
            callback(result.clone());
        }
    }
}

impl TickSource for ManualTickSource {
    fn subscribe(&self, on_tick: TickCallback) -> Subscription {
        let id = {
            let mut subscribers = lock(&self.subscribers);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.callbacks.insert(id, on_tick);
            id
        };

        let subscribers: Weak<Mutex<Subscribers>> = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                lock(&subscribers).callbacks.remove(&id);
            }
        })
    }
}

impl fmt::Debug for ManualTickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTickSource")
            .field("active_subscriptions", &self.active_subscriptions())
            .finish()
    }
}

fn lock(subscribers: &Mutex<Subscribers>) -> std::sync::MutexGuard<'_, Subscribers> {
    subscribers.lock().unwrap_or_else(|e| e.into_inner())
}
