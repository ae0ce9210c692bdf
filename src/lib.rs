//! Work/break countdown timer library
//!
//! This library provides the core of the worktimer widget.
//! It includes:
//! - Timer engine: shared clock, countdown timers, work/break pairs, presence
//! - Registry that owns the pairs and persists their settings
//! - Widget runtime driving the engine from tokio
//! - Terminal rendering, alert sounds and window raising behind traits
//! - CLI argument parsing and the stdin command surface

pub mod cli;
pub mod engine;
pub mod render;
pub mod settings;
pub mod sound;
pub mod types;
pub mod widget;
pub mod window;

// Re-export commonly used types for convenience
pub use engine::{
    Clock, Collaborators, PairEvent, PairHandle, PairPhase, PresenceEvent, PresenceSignal,
    RegistryError, Timer, TimerEvent, TimerPair, TimerRegistry, TimerState, ValidationError,
};

pub use render::{MockRenderer, Renderer, TerminalRenderer};

pub use settings::{
    FileSettingsStore, MemorySettingsStore, PersistenceError, PersistenceStore, Settings,
    SettingsEntry,
};

pub use sound::{
    create_alert_player, AlertPlayer, MockAlertPlayer, MutedAlertPlayer, RodioAlertPlayer,
    SoundError, SoundLibrary, SoundSource,
};

pub use types::{
    format_duration, parse_positive_int, ConfigError, Durations, Field, PairId, Phase, TimerId,
    WidgetConfig, MAX_DURATION,
};

pub use widget::{CommandError, Widget, WidgetCommand, WidgetError};

pub use window::{MockWindowController, TerminalBell, WindowController};
