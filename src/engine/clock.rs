//! Process-wide tick source.
//!
//! The clock owns the ordered list of subscribed timers. It does not call
//! back into them; the registry asks it for the subscriber snapshot on each
//! firing and routes the tick, re-checking the subscription at delivery time
//! so a timer stopped earlier in the same firing never sees the tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::types::TimerId;

/// Default period between two ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
struct ClockState {
    running: bool,
    subscribers: Vec<TimerId>,
    fired: u64,
}

/// Periodic tick source shared by every timer in the process.
#[derive(Debug)]
pub struct Clock {
    interval: Duration,
    state: Mutex<ClockState>,
}

impl Clock {
    /// Creates a stopped clock with the given period.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Mutex::new(ClockState::default()),
        }
    }

    /// Creates a stopped clock wrapped for sharing.
    pub fn shared(interval: Duration) -> Arc<Self> {
        Arc::new(Self::new(interval))
    }

    /// Returns the period between two ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts emitting ticks.
    pub fn start(&self) {
        let mut state = self.state();
        if !state.running {
            state.running = true;
            debug!(interval_ms = self.interval.as_millis() as u64, "Clock started");
        }
    }

    /// Stops emitting ticks. Subscriptions are kept.
    pub fn stop(&self) {
        let mut state = self.state();
        if state.running {
            state.running = false;
            debug!("Clock stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state().running
    }

    /// Adds a subscriber at the end of the delivery order.
    ///
    /// Returns false if the id was already subscribed.
    pub fn subscribe(&self, id: TimerId) -> bool {
        let mut state = self.state();
        if state.subscribers.contains(&id) {
            return false;
        }
        state.subscribers.push(id);
        trace!(timer = %id, "Subscribed to clock");
        true
    }

    /// Removes a subscriber.
    ///
    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: TimerId) -> bool {
        let mut state = self.state();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| *s != id);
        let removed = state.subscribers.len() != before;
        if removed {
            trace!(timer = %id, "Unsubscribed from clock");
        }
        removed
    }

    pub fn is_subscribed(&self, id: TimerId) -> bool {
        self.state().subscribers.contains(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }

    /// Performs one firing.
    ///
    /// Returns the subscribers in subscription order, or nothing while the
    /// clock is stopped.
    pub fn fire(&self) -> Vec<TimerId> {
        let mut state = self.state();
        if !state.running {
            return Vec::new();
        }
        state.fired += 1;
        trace!(tick = state.fired, subscribers = state.subscribers.len(), "Clock tick");
        state.subscribers.clone()
    }

    /// Number of firings since creation.
    pub fn ticks_fired(&self) -> u64 {
        self.state().fired
    }

    /// Builds the timer that paces [`Clock::fire`].
    ///
    /// The first tick is one period away. A late tick pushes the following
    /// ones back instead of bursting to catch up, so the schedule drifts with
    /// the consumer rather than staying aligned to absolute time.
    ///
    /// Must be called from within a tokio runtime.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

// ============================================================================
// Tests
// ============================================================================
