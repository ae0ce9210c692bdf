//! worktimer - work/break countdown timer for the terminal
//!
//! Runs a work countdown, then a break countdown, forever:
//! - the terminal bell rings when work ends
//! - an alert sound plays when the break ends
//! - `away` freezes work countdowns until `back`

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::warn;

use worktimer::cli::{spawn_stdin_reader, Cli};
use worktimer::{
    create_alert_player, AlertPlayer, Collaborators, FileSettingsStore, PersistenceStore,
    SoundLibrary, TerminalBell, TerminalRenderer, Widget,
};

/// Capacity of the command channel between stdin and the widget
const COMMAND_BUFFER: usize = 32;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        // The stdin read cannot be cancelled, so the runtime is not dropped.
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the widget from the CLI arguments and runs it.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config();

    let settings_path = config
        .settings_path
        .clone()
        .unwrap_or_else(FileSettingsStore::default_path);
    let store: Arc<dyn PersistenceStore> = Arc::new(FileSettingsStore::new(settings_path));

    let library = SoundLibrary::discover(&config.sounds_dir);
    let alert: Arc<dyn AlertPlayer> = Arc::from(create_alert_player(library, config.mute));
    let collaborators = Collaborators::new(
        Arc::new(TerminalRenderer::new()),
        alert,
        Arc::new(TerminalBell::new()),
    );

    let mut widget =
        Widget::new(config, collaborators, store).context("Invalid configuration")?;

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let _reader = spawn_stdin_reader(tx);

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    widget.run_until(rx, ctrl_c).await;

    Ok(())
}
