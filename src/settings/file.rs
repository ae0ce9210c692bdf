//! JSON settings file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PersistenceError;
use super::{PersistenceStore, Settings};

/// Directory under the home directory holding the settings file.
const SETTINGS_DIR: &str = ".worktimer";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

/// Settings store backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user location: `~/.worktimer/settings.json`.
    ///
    /// Falls back to the working directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(SETTINGS_DIR)
            .join(SETTINGS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceStore for FileSettingsStore {
    fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(PersistenceError::Encode)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), pairs = settings.pairs.len(), "Settings written");
        Ok(())
    }

    fn load(&self) -> Result<Settings, PersistenceError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let settings: Settings = serde_json::from_str(&json).map_err(PersistenceError::Parse)?;

        debug!(path = %self.path.display(), pairs = settings.pairs.len(), "Settings read");
        Ok(settings)
    }
}
