//! Sound alerts for the end of a break.
//!
//! This module provides:
//!
//! - Alert sound listing from a directory (`SoundLibrary`)
//! - Non-blocking playback through rodio (`RodioAlertPlayer`)
//! - A synthesized beep when a listed file cannot be played
//! - Graceful degradation when audio is unavailable (`MutedAlertPlayer`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use worktimer::sound::{AlertPlayer, RodioAlertPlayer, SoundLibrary};
//!
//! let library = SoundLibrary::discover(Path::new("Sounds"));
//! let player = RodioAlertPlayer::new(library, false).expect("audio init");
//! player.play_alert(0).expect("playback failed");
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

pub use error::SoundError;
pub use player::RodioAlertPlayer;
pub use source::{SoundLibrary, SoundSource};

/// Trait for alert playback implementations.
pub trait AlertPlayer {
    /// Plays the alert at `sound_index` in the sound listing.
    ///
    /// Must not block until playback ends.
    fn play_alert(&self, sound_index: usize) -> Result<(), SoundError>;
}

/// Alert player that plays nothing.
///
/// Used when the user mutes the widget or no audio device is present.
#[derive(Debug, Default)]
pub struct MutedAlertPlayer;

impl AlertPlayer for MutedAlertPlayer {
    fn play_alert(&self, sound_index: usize) -> Result<(), SoundError> {
        debug!(sound_index, "Alert muted");
        Ok(())
    }
}

/// Creates the rodio player, or a muted one if audio is unavailable.
#[must_use]
pub fn create_alert_player(library: SoundLibrary, mute: bool) -> Box<dyn AlertPlayer> {
    if mute {
        return Box::new(MutedAlertPlayer);
    }
    match RodioAlertPlayer::new(library, false) {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!(error = %e, "Audio not available, alerts muted");
            Box::new(MutedAlertPlayer)
        }
    }
}

/// Mock alert player for testing.
#[derive(Debug, Default)]
pub struct MockAlertPlayer {
    play_calls: Mutex<Vec<usize>>,
    should_fail: AtomicBool,
}

impl MockAlertPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    /// Sound indices requested so far, oldest first.
    #[must_use]
    pub fn played(&self) -> Vec<usize> {
        self.calls().clone()
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<usize>> {
        self.play_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlertPlayer for MockAlertPlayer {
    fn play_alert(&self, sound_index: usize) -> Result<(), SoundError> {
        self.calls().push(sound_index);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::StreamError("Mock failure".to_string()));
        }
        Ok(())
    }
}
