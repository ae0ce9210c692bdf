//! Settings persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while saving or loading settings.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the settings file failed.
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored settings are not valid JSON of the expected shape.
    #[error("malformed settings: {0}")]
    Parse(#[source] serde_json::Error),

    /// Settings could not be encoded.
    #[error("cannot encode settings: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store refused the operation.
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    /// Returns true if the settings simply have not been saved yet.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing() {
        let err = PersistenceError::Io {
            path: PathBuf::from("/tmp/x.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_missing());
        assert!(err.to_string().contains("/tmp/x.json"));

        let err = PersistenceError::Unavailable("locked".to_string());
        assert!(!err.is_missing());
    }
}
