//! Single countdown timer.
//!
//! This module provides the countdown state machine:
//! - State transitions (Idle → Running ⇄ Paused → Idle)
//! - Clock subscription while counting
//! - Lifecycle events for renderers and the owning pair

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::clock::Clock;
use super::events::EventEmitter;
use crate::types::TimerId;

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Not counting; remaining time is zero
    #[default]
    Idle,
    /// Counting down on every clock tick
    Running,
    /// Receiving ticks but ignoring them
    Paused,
}

impl TimerState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }
}

// ============================================================================
// TimerEvent
// ============================================================================

/// Lifecycle events emitted by a [`Timer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown set; carries the initial remaining time
    Started { id: TimerId, remaining: Duration },
    /// One tick consumed without reaching zero
    Progressed { id: TimerId, remaining: Duration },
    /// Remaining time reached zero
    Completed { id: TimerId },
    /// Stopped on request (also emitted when already idle)
    Stopped { id: TimerId },
    /// Countdown frozen
    Paused { id: TimerId, remaining: Duration },
    /// Countdown unfrozen
    Resumed { id: TimerId, remaining: Duration },
}

impl TimerEvent {
    /// Returns the id of the timer that emitted the event.
    pub fn timer_id(&self) -> TimerId {
        match self {
            TimerEvent::Started { id, .. }
            | TimerEvent::Progressed { id, .. }
            | TimerEvent::Completed { id }
            | TimerEvent::Stopped { id }
            | TimerEvent::Paused { id, .. }
            | TimerEvent::Resumed { id, .. } => *id,
        }
    }

    /// Returns the remaining time carried by the event, if any.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            TimerEvent::Started { remaining, .. }
            | TimerEvent::Progressed { remaining, .. }
            | TimerEvent::Paused { remaining, .. }
            | TimerEvent::Resumed { remaining, .. } => Some(*remaining),
            TimerEvent::Completed { .. } | TimerEvent::Stopped { .. } => None,
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Countdown driven by the shared [`Clock`].
///
/// The timer is subscribed to the clock exactly while it is Running or
/// Paused. Every path back to Idle unsubscribes before returning, so a tick
/// delivered afterwards cannot reach a reused instance.
#[derive(Debug)]
pub struct Timer {
    id: TimerId,
    remaining: Duration,
    initial: Duration,
    tick_granularity: Duration,
    state: TimerState,
    clock: Arc<Clock>,
    events: EventEmitter<TimerEvent>,
}

impl Timer {
    /// Creates an idle timer that decrements by one clock period per tick.
    pub fn new(clock: Arc<Clock>) -> Self {
        let granularity = clock.interval();
        Self::with_granularity(clock, granularity)
    }

    /// Creates an idle timer with an explicit decrement per tick.
    pub fn with_granularity(clock: Arc<Clock>, tick_granularity: Duration) -> Self {
        Self {
            id: TimerId::next(),
            remaining: Duration::ZERO,
            initial: Duration::ZERO,
            tick_granularity,
            state: TimerState::Idle,
            clock,
            events: EventEmitter::new(),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn tick_granularity(&self) -> Duration {
        self.tick_granularity
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    /// Returns true while a countdown is in progress (running or paused).
    pub fn is_active(&self) -> bool {
        self.state != TimerState::Idle
    }

    /// Remaining time as a rounded percentage of the last delay set.
    pub fn progress_percent(&self) -> u8 {
        if self.initial.is_zero() {
            return 0;
        }
        let ratio = self.remaining.as_secs_f64() / self.initial.as_secs_f64();
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Subscribes to this timer's events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        self.events.subscribe()
    }

    /// Starts a countdown of `delay`, abandoning any countdown in progress.
    ///
    /// `delay` is not validated here.
    pub fn set(&mut self, delay: Duration) -> TimerEvent {
        self.halt();
        self.initial = delay;
        self.remaining = delay;
        self.state = TimerState::Running;
        self.clock.subscribe(self.id);

        debug!(timer = %self.id, delay_ms = delay.as_millis() as u64, "Timer set");
        self.publish(TimerEvent::Started {
            id: self.id,
            remaining: delay,
        })
    }

    /// Consumes one clock tick.
    ///
    /// Returns `None` when the tick is ignored (idle or paused).
    pub fn tick(&mut self) -> Option<TimerEvent> {
        match self.state {
            TimerState::Running => {}
            TimerState::Paused => return None,
            TimerState::Idle => {
                trace!(timer = %self.id, "Tick ignored on idle timer");
                return None;
            }
        }

        self.remaining = self.remaining.saturating_sub(self.tick_granularity);
        if self.remaining.is_zero() {
            self.halt();
            debug!(timer = %self.id, "Timer completed");
            Some(self.publish(TimerEvent::Completed { id: self.id }))
        } else {
            Some(self.publish(TimerEvent::Progressed {
                id: self.id,
                remaining: self.remaining,
            }))
        }
    }

    /// Stops the countdown and clears the remaining time.
    ///
    /// `Stopped` is emitted even when the timer was already idle.
    pub fn stop(&mut self) -> TimerEvent {
        if self.is_active() {
            debug!(timer = %self.id, remaining_ms = self.remaining.as_millis() as u64, "Timer stopped");
        }
        self.halt();
        self.publish(TimerEvent::Stopped { id: self.id })
    }

    /// Freezes a running countdown. No-op in any other state.
    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        debug!(timer = %self.id, "Timer paused");
        Some(self.publish(TimerEvent::Paused {
            id: self.id,
            remaining: self.remaining,
        }))
    }

    /// Unfreezes a paused countdown. No-op in any other state.
    pub fn resume(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        debug!(timer = %self.id, "Timer resumed");
        Some(self.publish(TimerEvent::Resumed {
            id: self.id,
            remaining: self.remaining,
        }))
    }

    fn halt(&mut self) {
        self.clock.unsubscribe(self.id);
        self.remaining = Duration::ZERO;
        self.state = TimerState::Idle;
    }

    fn publish(&mut self, event: TimerEvent) -> TimerEvent {
        self.events.emit(&event);
        event
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.clock.unsubscribe(self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================
