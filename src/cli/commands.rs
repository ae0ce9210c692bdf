//! Command-line arguments for the worktimer binary.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::types::WidgetConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Work/break countdown timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "worktimer",
    version,
    about = "Work/break countdown timer",
    long_about = "Runs one or more work/break countdown pairs in the terminal.\n\
                  Type commands on stdin: add [work] [break], remove <n>, \
                  update <n> <work> <break>, begin <n>, stop <n>, away, back, quit."
)]
pub struct Cli {
    /// Work duration in seconds for a fresh pair
    #[arg(
        short,
        long,
        default_value = "1500",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub work: u64,

    /// Break duration in seconds for a fresh pair
    #[arg(
        short,
        long = "break",
        default_value = "300",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub break_secs: u64,

    /// Clock period in milliseconds
    #[arg(
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,

    /// Settings file (defaults to ~/.worktimer/settings.json)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Directory listing the alert sounds
    #[arg(long, default_value = "Sounds")]
    pub sounds: PathBuf,

    /// Index of the alert sound in the sorted listing
    #[arg(short, long, default_value = "0")]
    pub alert_sound: usize,

    /// Disable alert sounds
    #[arg(short, long)]
    pub mute: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the widget configuration from the parsed arguments.
    pub fn into_config(self) -> WidgetConfig {
        WidgetConfig {
            tick_interval_ms: self.tick_ms,
            default_work_secs: self.work,
            default_break_secs: self.break_secs,
            settings_path: self.settings,
            sounds_dir: self.sounds,
            alert_sound: self.alert_sound,
            mute: self.mute,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
