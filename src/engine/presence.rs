//! Process-wide away/back state.
//!
//! The presence detector flips the state through [`PresenceSignal`]; each
//! timer pair holds a [`PresenceSubscription`] and applies the transitions
//! it has not seen yet. Only work timers react.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// A presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// The user left; work countdowns freeze
    Away,
    /// The user returned; work countdowns continue
    Back,
}

/// Shared away/back flag, initially back.
#[derive(Debug)]
pub struct PresenceSignal {
    tx: watch::Sender<bool>,
}

impl PresenceSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn mark_away(&self) {
        self.set_away(true);
    }

    pub fn mark_back(&self) {
        self.set_away(false);
    }

    /// Sets the state from a boolean away flag.
    pub fn set_away(&self, away: bool) {
        let previous = self.tx.send_replace(away);
        if previous != away {
            info!(away, "Presence changed");
        }
    }

    pub fn is_away(&self) -> bool {
        *self.tx.borrow()
    }

    /// Creates a subscription that has applied nothing yet.
    ///
    /// If the user is already away, the first poll reports `Away`.
    pub fn subscribe(&self) -> PresenceSubscription {
        PresenceSubscription {
            rx: self.tx.subscribe(),
            applied_away: false,
        }
    }
}

impl Default for PresenceSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One consumer's view of the presence state.
#[derive(Debug)]
pub struct PresenceSubscription {
    rx: watch::Receiver<bool>,
    applied_away: bool,
}

impl PresenceSubscription {
    /// Returns the transition this consumer has not applied yet, if any.
    ///
    /// Away→back→away between two polls collapses to nothing.
    pub fn poll(&mut self) -> Option<PresenceEvent> {
        let away = *self.rx.borrow_and_update();
        if away == self.applied_away {
            return None;
        }
        self.applied_away = away;
        Some(if away {
            PresenceEvent::Away
        } else {
            PresenceEvent::Back
        })
    }

    /// Waits until the presence state is written again.
    ///
    /// Never resolves once the signal is dropped.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
