//! Alert sound listing.
//!
//! Alert sounds are the audio files found in one directory, sorted by file
//! name. An alert is addressed by its position in that listing.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::SoundError;

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "ogg", "flac"];

/// One playable sound file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSource {
    name: String,
    path: PathBuf,
}

impl SoundSource {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// File stem of the sound (e.g., "bell").
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered list of alert sounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLibrary {
    sounds: Vec<SoundSource>,
}

impl SoundLibrary {
    /// Builds a library from an explicit list, keeping its order.
    #[must_use]
    pub fn from_sources(sounds: Vec<SoundSource>) -> Self {
        Self { sounds }
    }

    /// Lists the supported audio files in `dir`, sorted by file name.
    ///
    /// A missing or unreadable directory yields an empty library.
    #[must_use]
    pub fn discover(dir: &Path) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Cannot list alert sounds");
                return Self::default();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_supported(path))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let sounds: Vec<SoundSource> = paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(SoundSource::new(name, path))
            })
            .collect();

        debug!(dir = %dir.display(), count = sounds.len(), "Alert sounds listed");
        Self { sounds }
    }

    /// Returns the sound at `index`.
    pub fn get(&self, index: usize) -> Result<&SoundSource, SoundError> {
        self.sounds.get(index).ok_or(SoundError::UnknownSound {
            index,
            available: self.sounds.len(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoundSource> {
        self.sounds.iter()
    }
}

fn is_supported(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
