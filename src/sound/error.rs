//! Sound system error types.

use thiserror::Error;

/// Errors that can occur while playing an alert.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// No sound is listed at the requested position.
    #[error("no alert sound at index {index} ({available} available)")]
    UnknownSound { index: usize, available: usize },

    /// Sound file could not be opened.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if playback should fall back to the built-in beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        matches!(
            self,
            Self::UnknownSound { .. } | Self::FileNotFound(_) | Self::DecodeError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::UnknownSound {
            index: 3,
            available: 1,
        };
        assert!(err.to_string().contains("index 3"));
        assert!(err.to_string().contains("1 available"));

        let err = SoundError::FileNotFound("/tmp/a.wav".to_string());
        assert!(err.to_string().contains("/tmp/a.wav"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_beep() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_beep());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_beep());
        assert!(SoundError::UnknownSound {
            index: 0,
            available: 0
        }
        .should_fallback_to_beep());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_beep());
    }
}
