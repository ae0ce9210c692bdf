//! Core data types for the work/break timer.
//!
//! This module defines the data structures shared across the crate:
//! - Timer and pair identifiers
//! - Visual phases and form fields
//! - Work/break durations with validation
//! - Widget configuration

pub mod format;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use format::{format_duration, parse_positive_int};

// ============================================================================
// Identifiers
// ============================================================================

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PAIR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a single countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Allocates the next free timer id.
    pub fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Process-unique identifier of a work/break timer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(u64);

impl PairId {
    /// Allocates the next free pair id.
    pub fn next() -> Self {
        Self(NEXT_PAIR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pair-{}", self.0)
    }
}

// ============================================================================
// Phase / Field
// ============================================================================

/// Visual phase of a pair, as shown by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Work styling (the default look)
    #[default]
    Work,
    /// Break styling
    Break,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The work delay input
    WorkDelay,
    /// The break delay input
    BreakDelay,
}

impl Field {
    /// Returns the string representation of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::WorkDelay => "work_delay",
            Field::BreakDelay => "break_delay",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Longest duration that settings can store (`u64::MAX` milliseconds).
pub const MAX_DURATION: Duration = Duration::from_millis(u64::MAX);

/// Work and break lengths of one timer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Durations {
    /// Length of the work phase
    pub work_duration: Duration,
    /// Length of the break phase
    pub break_duration: Duration,
}

impl Durations {
    pub fn new(work_duration: Duration, break_duration: Duration) -> Self {
        Self {
            work_duration,
            break_duration,
        }
    }

    /// Convenience constructor from whole seconds.
    pub fn from_secs(work_secs: u64, break_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(work_secs),
            Duration::from_secs(break_secs),
        )
    }

    /// Returns the fields whose duration is zero or longer than
    /// [`MAX_DURATION`], in form order.
    pub fn invalid_fields(&self) -> Vec<Field> {
        let out_of_range = |d: Duration| d.is_zero() || d > MAX_DURATION;
        let mut fields = Vec::new();
        if out_of_range(self.work_duration) {
            fields.push(Field::WorkDelay);
        }
        if out_of_range(self.break_duration) {
            fields.push(Field::BreakDelay);
        }
        fields
    }

    /// Returns true if both durations are positive and storable.
    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_secs(25 * 60, 5 * 60)
    }
}

// ============================================================================
// WidgetConfig
// ============================================================================

/// Errors raised while validating a [`WidgetConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("default {0} duration must be positive and fit in u64 milliseconds")]
    ZeroDuration(Field),
}

/// Runtime configuration of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Clock period and countdown granularity in milliseconds
    pub tick_interval_ms: u64,
    /// Work length used for a fresh pair, in seconds
    pub default_work_secs: u64,
    /// Break length used for a fresh pair, in seconds
    pub default_break_secs: u64,
    /// Settings file location (`None` selects the per-user default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<std::path::PathBuf>,
    /// Directory listing the alert sounds
    pub sounds_dir: std::path::PathBuf,
    /// Index into the sorted sound listing played when a break ends
    pub alert_sound: usize,
    /// Skip audio output entirely
    pub mute: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            default_work_secs: 25 * 60,
            default_break_secs: 5 * 60,
            settings_path: None,
            sounds_dir: std::path::PathBuf::from("Sounds"),
            alert_sound: 0,
            mute: false,
        }
    }
}

impl WidgetConfig {
    pub fn with_tick_interval_ms(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    pub fn with_default_durations(mut self, work_secs: u64, break_secs: u64) -> Self {
        self.default_work_secs = work_secs;
        self.default_break_secs = break_secs;
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Clock period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Durations given to a pair created without saved settings.
    pub fn default_durations(&self) -> Durations {
        Durations::from_secs(self.default_work_secs, self.default_break_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if let Some(field) = self.default_durations().invalid_fields().first() {
            return Err(ConfigError::ZeroDuration(*field));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
