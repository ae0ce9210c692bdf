//! The widget event loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::command::WidgetCommand;
use crate::engine::{
    Clock, Collaborators, PairHandle, PresenceSignal, PresenceSubscription, RegistryError,
    TimerRegistry, ValidationError,
};
use crate::settings::PersistenceStore;
use crate::types::{ConfigError, WidgetConfig};

/// Errors raised while applying a [`WidgetCommand`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// Holds the 1-based pair number the user typed
    #[error("no pair number {0}")]
    NoSuchPair(usize),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Clock, presence and registry wired together and driven by tokio.
#[derive(Debug)]
pub struct Widget {
    config: WidgetConfig,
    registry: TimerRegistry,
    presence_rx: PresenceSubscription,
}

impl Widget {
    /// Builds the widget. Nothing runs until [`Widget::run`].
    pub fn new(
        config: WidgetConfig,
        collaborators: Collaborators,
        store: Arc<dyn PersistenceStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = Clock::shared(config.tick_interval());
        let presence = PresenceSignal::shared();
        let presence_rx = presence.subscribe();
        let registry = TimerRegistry::new(clock, presence, store, collaborators)
            .with_alert_sound(config.alert_sound);

        Ok(Self {
            config,
            registry,
            presence_rx,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    /// Shared presence flag for external away/back detectors.
    pub fn presence(&self) -> Arc<PresenceSignal> {
        Arc::clone(self.registry.presence())
    }

    /// Restores saved pairs, or creates one with default durations, then
    /// starts every pair and the clock.
    pub fn startup(&mut self) {
        if self.registry.restore() == 0 {
            let defaults = self.config.default_durations();
            match self
                .registry
                .add_pair(defaults.work_duration, defaults.break_duration)
            {
                Ok(_) => {
                    self.registry.persist();
                }
                Err(e) => warn!(error = %e, "Default pair rejected"),
            }
        }
        self.registry.begin_all();
        self.registry.clock().start();
        info!(pairs = self.registry.len(), "Widget started");
    }

    /// Applies one command. [`WidgetCommand::Quit`] stops every pair.
    pub fn apply(&mut self, command: WidgetCommand) -> Result<(), WidgetError> {
        debug!(?command, "Applying command");
        match command {
            WidgetCommand::AddPair {
                work_secs,
                break_secs,
            } => {
                let work = work_secs.unwrap_or(self.config.default_work_secs);
                let break_ = break_secs.unwrap_or(self.config.default_break_secs);
                let handle = self
                    .registry
                    .add_pair(Duration::from_secs(work), Duration::from_secs(break_))?;
                self.registry.begin(handle)?;
                self.registry.persist();
            }
            WidgetCommand::RemovePair { index } => {
                let handle = self.handle_at(index)?;
                self.registry.remove_pair(handle);
                self.registry.persist();
            }
            WidgetCommand::Update {
                index,
                work,
                break_,
            } => {
                let handle = self.handle_at(index)?;
                self.registry.update_from_input(handle, &work, &break_)?;
            }
            WidgetCommand::Begin { index } => {
                let handle = self.handle_at(index)?;
                self.registry.begin(handle)?;
            }
            WidgetCommand::StopAll { index } => {
                let handle = self.handle_at(index)?;
                self.registry.stop_all(handle)?;
            }
            WidgetCommand::Away => {
                self.registry.presence().mark_away();
                self.registry.sync_presence();
            }
            WidgetCommand::Back => {
                self.registry.presence().mark_back();
                self.registry.sync_presence();
            }
            WidgetCommand::Quit => self.registry.shutdown(),
        }
        Ok(())
    }

    /// Runs until `Quit` is received or the command channel closes.
    pub async fn run(&mut self, commands: mpsc::Receiver<WidgetCommand>) {
        self.run_until(commands, std::future::pending()).await;
    }

    /// Runs until `Quit`, a closed command channel, or `shutdown` completes.
    pub async fn run_until<F>(&mut self, mut commands: mpsc::Receiver<WidgetCommand>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.startup();
        let mut ticker = self.registry.clock().ticker();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.registry.dispatch_tick();
                }
                () = self.presence_rx.changed() => {
                    self.presence_rx.poll();
                    self.registry.sync_presence();
                }
                command = commands.recv() => match command {
                    Some(WidgetCommand::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(command) => {
                        if let Err(e) = self.apply(command) {
                            warn!(error = %e, "Command failed");
                        }
                    }
                    None => {
                        debug!("Command channel closed");
                        break;
                    }
                },
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        self.registry.shutdown();
    }

    fn handle_at(&self, index: usize) -> Result<PairHandle, WidgetError> {
        self.registry
            .handle_at(index)
            .ok_or(WidgetError::NoSuchPair(index + 1))
    }
}

// ============================================================================
// Tests
// ============================================================================
