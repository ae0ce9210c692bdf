//! Persisted per-pair settings.
//!
//! Settings are the ordered list of work/break durations, one entry per
//! timer pair. Stores are best-effort: callers log failures and carry on.

mod error;
mod file;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Durations;

pub use error::PersistenceError;
pub use file::FileSettingsStore;

// ============================================================================
// Settings
// ============================================================================

/// Durations of one pair, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsEntry {
    pub work_ms: u64,
    pub break_ms: u64,
}

impl SettingsEntry {
    pub fn new(work_ms: u64, break_ms: u64) -> Self {
        Self { work_ms, break_ms }
    }

    pub fn durations(&self) -> Durations {
        Durations::new(
            Duration::from_millis(self.work_ms),
            Duration::from_millis(self.break_ms),
        )
    }
}

impl From<Durations> for SettingsEntry {
    fn from(durations: Durations) -> Self {
        let millis = |d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self::new(
            millis(durations.work_duration),
            millis(durations.break_duration),
        )
    }
}

/// The whole persisted blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pairs: Vec<SettingsEntry>,
}

impl Settings {
    pub fn from_durations(durations: impl IntoIterator<Item = Durations>) -> Self {
        Self {
            pairs: durations.into_iter().map(SettingsEntry::from).collect(),
        }
    }

    pub fn durations(&self) -> Vec<Durations> {
        self.pairs.iter().map(SettingsEntry::durations).collect()
    }
}

// ============================================================================
// PersistenceStore
// ============================================================================

/// Trait for settings storage backends.
pub trait PersistenceStore {
    fn save(&self, settings: &Settings) -> Result<(), PersistenceError>;

    fn load(&self) -> Result<Settings, PersistenceError>;
}

/// In-memory store with failure injection, for tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    stored: Mutex<Option<Settings>>,
    saves: AtomicUsize,
    fail_save: AtomicBool,
    fail_load: AtomicBool,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `settings`.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let store = Self::default();
        *store.slot() = Some(settings);
        store
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stored(&self) -> Option<Settings> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Settings>> {
        self.stored.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceStore for MemorySettingsStore {
    fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("save disabled".to_string()));
        }
        *self.slot() = Some(settings.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> Result<Settings, PersistenceError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("load disabled".to_string()));
        }
        self.slot()
            .clone()
            .ok_or_else(|| PersistenceError::Unavailable("nothing saved".to_string()))
    }
}
