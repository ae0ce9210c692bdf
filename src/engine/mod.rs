//! Timer engine
//!
//! This module contains the countdown core of the widget:
//! - [`Clock`]: the shared fixed-interval tick source
//! - [`Timer`]: one countdown with pause/resume
//! - [`TimerPair`]: the work/break cycle
//! - [`PresenceSignal`]: the away/back flag that freezes work countdowns
//! - [`TimerRegistry`]: ownership, tick routing and settings persistence

mod clock;
mod collaborators;
mod error;
mod events;
mod pair;
mod presence;
mod registry;
mod timer;

pub use clock::{Clock, DEFAULT_TICK_INTERVAL};
pub use collaborators::Collaborators;
pub use error::{RegistryError, ValidationError, INVALID_DELAY_MESSAGE};
pub use events::EventEmitter;
pub use pair::{PairEvent, PairPhase, TimerPair};
pub use presence::{PresenceEvent, PresenceSignal, PresenceSubscription};
pub use registry::{PairHandle, TimerRegistry};
pub use timer::{Timer, TimerEvent, TimerState};
