//! Ownership and wiring of all timer pairs.
//!
//! The registry is the single owner of every [`TimerPair`]. It routes clock
//! firings to the pair that owns each subscribed timer, relays presence
//! transitions, and saves the ordered list of durations whenever a pair's
//! settings change.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::clock::Clock;
use super::collaborators::Collaborators;
use super::error::{RegistryError, ValidationError, INVALID_DELAY_MESSAGE};
use super::pair::{PairEvent, TimerPair};
use super::presence::{PresenceEvent, PresenceSignal, PresenceSubscription};
use crate::settings::{PersistenceStore, Settings};
use crate::types::{Durations, PairId};

// ============================================================================
// PairHandle
// ============================================================================

/// Opaque reference to a pair owned by a [`TimerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairHandle(PairId);

impl PairHandle {
    pub fn pair_id(&self) -> PairId {
        self.0
    }
}

impl fmt::Display for PairHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Entry {
    pair: TimerPair,
    presence: PresenceSubscription,
    settings_rx: mpsc::UnboundedReceiver<PairEvent>,
}

// ============================================================================
// TimerRegistry
// ============================================================================

/// Owns the timer pairs and connects them to the clock, presence and storage.
pub struct TimerRegistry {
    clock: Arc<Clock>,
    presence: Arc<PresenceSignal>,
    store: Arc<dyn PersistenceStore>,
    collaborators: Collaborators,
    alert_sound: usize,
    entries: Vec<Entry>,
}

impl TimerRegistry {
    pub fn new(
        clock: Arc<Clock>,
        presence: Arc<PresenceSignal>,
        store: Arc<dyn PersistenceStore>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            clock,
            presence,
            store,
            collaborators,
            alert_sound: 0,
            entries: Vec::new(),
        }
    }

    /// Selects the alert sound for pairs created from now on.
    pub fn with_alert_sound(mut self, sound_index: usize) -> Self {
        self.alert_sound = sound_index;
        self
    }

    pub fn clock(&self) -> &Arc<Clock> {
        &self.clock
    }

    pub fn presence(&self) -> &Arc<PresenceSignal> {
        &self.presence
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles of all pairs, in creation order.
    pub fn handles(&self) -> Vec<PairHandle> {
        self.entries
            .iter()
            .map(|entry| PairHandle(entry.pair.id()))
            .collect()
    }

    /// Handle of the pair at `index` (0-based, creation order).
    pub fn handle_at(&self, index: usize) -> Option<PairHandle> {
        self.entries.get(index).map(|entry| PairHandle(entry.pair.id()))
    }

    pub fn pair(&self, handle: PairHandle) -> Option<&TimerPair> {
        self.entries
            .iter()
            .find(|entry| entry.pair.id() == handle.0)
            .map(|entry| &entry.pair)
    }

    /// Durations of all pairs, in creation order.
    pub fn snapshot(&self) -> Settings {
        Settings::from_durations(self.entries.iter().map(|entry| entry.pair.durations()))
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// Creates an idle pair and wires it to presence and persistence.
    ///
    /// The current away state is applied on the next presence sync. Nothing
    /// is saved here. Rejected durations are reported to the renderer per
    /// field.
    pub fn add_pair(
        &mut self,
        work_duration: Duration,
        break_duration: Duration,
    ) -> Result<PairHandle, ValidationError> {
        let durations = Durations::new(work_duration, break_duration);
        let invalid = durations.invalid_fields();
        if !invalid.is_empty() {
            for field in &invalid {
                self.collaborators
                    .renderer
                    .render_validation_error(INVALID_DELAY_MESSAGE, *field);
            }
            warn!(fields = ?invalid, "Rejected new pair");
            return Err(ValidationError::NonPositive { fields: invalid });
        }
        Ok(self.insert(durations))
    }

    fn insert(&mut self, durations: Durations) -> PairHandle {
        let mut pair = TimerPair::new(
            durations,
            Arc::clone(&self.clock),
            self.collaborators.clone(),
        )
        .with_alert_sound(self.alert_sound);
        let settings_rx = pair.subscribe();
        let handle = PairHandle(pair.id());

        debug!(pair = %handle, work_ms = durations.work_duration.as_millis() as u64, "Pair added");
        self.entries.push(Entry {
            pair,
            presence: self.presence.subscribe(),
            settings_rx,
        });
        handle
    }

    /// Stops and drops a pair. Returns false if it did not exist.
    pub fn remove_pair(&mut self, handle: PairHandle) -> bool {
        let Some(index) = self.index_of(handle) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.pair.stop_all();
        debug!(pair = %handle, "Pair removed");
        true
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Saves the durations of all pairs. Failures are logged, not returned.
    pub fn persist(&self) -> bool {
        let settings = self.snapshot();
        match self.store.save(&settings) {
            Ok(()) => {
                debug!(pairs = settings.pairs.len(), "Settings saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to save settings");
                false
            }
        }
    }

    /// Replaces all pairs with the saved ones.
    ///
    /// A failed load leaves the registry empty. Returns the number of pairs
    /// restored.
    pub fn restore(&mut self) -> usize {
        self.clear();

        let settings = match self.store.load() {
            Ok(settings) => settings,
            Err(e) if e.is_missing() => {
                debug!("No saved settings");
                return 0;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load settings");
                return 0;
            }
        };

        for durations in settings.durations() {
            if durations.is_valid() {
                self.insert(durations);
            } else {
                warn!(fields = ?durations.invalid_fields(), "Skipping saved pair with invalid durations");
            }
        }
        info!(pairs = self.entries.len(), "Settings restored");
        self.entries.len()
    }

    fn clear(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.pair.stop_all();
        }
    }

    /// Saves if any pair reported new settings since the last call.
    fn flush_settings_changes(&mut self) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            while let Ok(event) = entry.settings_rx.try_recv() {
                if matches!(event, PairEvent::SettingsChanged { .. }) {
                    changed = true;
                }
            }
        }
        if changed {
            self.persist();
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Clock / presence routing
    // ------------------------------------------------------------------------

    /// Performs one clock firing and delivers it.
    ///
    /// Returns the number of ticks delivered.
    pub fn dispatch_tick(&mut self) -> usize {
        self.sync_presence();

        let mut delivered = 0;
        for timer in self.clock.fire() {
            // Stopped earlier in this firing
            if !self.clock.is_subscribed(timer) {
                continue;
            }
            match self.entries.iter_mut().find(|entry| entry.pair.owns(timer)) {
                Some(entry) => {
                    entry.pair.tick(timer);
                    delivered += 1;
                }
                None => trace!(timer = %timer, "Tick for unowned timer dropped"),
            }
        }
        delivered
    }

    /// Applies pending away/back transitions to every pair's work timer.
    pub fn sync_presence(&mut self) {
        for entry in &mut self.entries {
            match entry.presence.poll() {
                Some(PresenceEvent::Away) => {
                    entry.pair.pause_work();
                }
                Some(PresenceEvent::Back) => {
                    entry.pair.resume_work();
                }
                None => {}
            }
        }
    }

    // ------------------------------------------------------------------------
    // Pair operations
    // ------------------------------------------------------------------------

    pub fn begin(&mut self, handle: PairHandle) -> Result<(), RegistryError> {
        self.pair_mut(handle)?.begin();
        Ok(())
    }

    /// Begins every pair, in creation order.
    pub fn begin_all(&mut self) {
        for entry in &mut self.entries {
            entry.pair.begin();
        }
    }

    pub fn stop_all(&mut self, handle: PairHandle) -> Result<(), RegistryError> {
        self.pair_mut(handle)?.stop_all();
        Ok(())
    }

    /// Stops every pair and the clock.
    pub fn shutdown(&mut self) {
        for entry in &mut self.entries {
            entry.pair.stop_all();
        }
        self.clock.stop();
    }

    /// Updates one pair's durations and saves on success.
    pub fn update_durations(
        &mut self,
        handle: PairHandle,
        work_duration: Duration,
        break_duration: Duration,
    ) -> Result<(), RegistryError> {
        self.pair_mut(handle)?
            .update_durations(work_duration, break_duration)?;
        self.flush_settings_changes();
        Ok(())
    }

    /// Updates one pair from raw user input in seconds and saves on success.
    pub fn update_from_input(
        &mut self,
        handle: PairHandle,
        work_secs: &str,
        break_secs: &str,
    ) -> Result<(), RegistryError> {
        self.pair_mut(handle)?
            .update_from_input(work_secs, break_secs)?;
        self.flush_settings_changes();
        Ok(())
    }

    fn index_of(&self, handle: PairHandle) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.pair.id() == handle.0)
    }

    fn pair_mut(&mut self, handle: PairHandle) -> Result<&mut TimerPair, RegistryError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.pair.id() == handle.0)
            .map(|entry| &mut entry.pair)
            .ok_or(RegistryError::UnknownPair(handle))
    }
}

impl fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("clock", &self.clock)
            .field("pairs", &self.handles())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
