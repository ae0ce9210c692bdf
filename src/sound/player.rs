//! Alert player implementation using rodio.
//!
//! This module provides the `RodioAlertPlayer` which plays the listed alert
//! sounds through the rodio v0.20 audio library, falling back to a short
//! synthesized beep when a file cannot be played.

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{SoundLibrary, SoundSource};
use super::AlertPlayer;

/// Pitch of the fallback beep in Hz.
const BEEP_FREQUENCY: f32 = 880.0;

/// Length of the fallback beep.
const BEEP_DURATION: Duration = Duration::from_millis(400);

/// An alert player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioAlertPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    library: SoundLibrary,
    disabled: AtomicBool,
}

impl RodioAlertPlayer {
    /// Creates a new player over the given sound listing.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(library: SoundLibrary, disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!(sounds = library.len(), "Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            library,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Plays the sound at `index`, or the beep if that sound is unusable.
    pub fn play(&self, index: usize) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        let result = self
            .library
            .get(index)
            .and_then(|source| self.play_file(source));

        match result {
            Err(e) if e.should_fallback_to_beep() => {
                warn!(index, error = %e, "Alert sound unusable, falling back to beep");
                self.play_beep()
            }
            other => other,
        }
    }

    fn play_file(&self, source: &SoundSource) -> Result<(), SoundError> {
        debug!(sound = source.name(), "Playing alert sound");
        let path = source.path();
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_beep(&self) -> Result<(), SoundError> {
        let beep = SineWave::new(BEEP_FREQUENCY)
            .take_duration(BEEP_DURATION)
            .amplify(0.2);

        let sink = self.sink()?;
        sink.append(beep);
        sink.detach();
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

impl AlertPlayer for RodioAlertPlayer {
    fn play_alert(&self, sound_index: usize) -> Result<(), SoundError> {
        self.play(sound_index)
    }
}

impl std::fmt::Debug for RodioAlertPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlertPlayer")
            .field("sounds", &self.library.len())
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests may run without audio hardware (e.g., CI containers);
    // they return early when no output device can be opened.

    #[test]
    fn test_disabled_player_skips_playback() {
        let player = match RodioAlertPlayer::new(SoundLibrary::default(), true) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(player.is_disabled());
        assert!(player.play(0).is_ok());
    }

    #[test]
    fn test_enable_disable() {
        let player = match RodioAlertPlayer::new(SoundLibrary::default(), true) {
            Ok(p) => p,
            Err(_) => return,
        };

        player.enable();
        assert!(!player.is_disabled());
        player.disable();
        assert!(player.is_disabled());
    }

    #[test]
    fn test_missing_file_falls_back_to_beep() {
        let library =
            SoundLibrary::from_sources(vec![SoundSource::new("gone", "/nonexistent/gone.wav")]);
        let player = match RodioAlertPlayer::new(library, false) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(player.play(0).is_ok());
        assert!(player.play(9).is_ok());
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioAlertPlayer::new(SoundLibrary::default(), true) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(format!("{player:?}").contains("RodioAlertPlayer"));
    }
}
