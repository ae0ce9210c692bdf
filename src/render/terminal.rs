//! Plain terminal output.

use std::time::Duration;

use crate::types::{format_duration, Field, PairId, Phase, TimerId};

use super::Renderer;

/// Renderer printing one line per change to stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    fn phase_banner(phase: Phase) -> &'static str {
        match phase {
            Phase::Work => "== WORK ==",
            Phase::Break => "-- break --",
        }
    }

    fn progress_bar(percent: u8) -> String {
        let filled = usize::from(percent.min(100)) / 5;
        format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
    }
}

impl Renderer for TerminalRenderer {
    fn render_remaining(&self, timer: TimerId, remaining: Duration) {
        println!("{timer}  {}", format_duration(remaining));
    }

    fn render_progress(&self, pair: PairId, percent: u8) {
        println!("{pair}  {} {percent:>3}%", Self::progress_bar(percent));
    }

    fn set_visual_phase(&self, pair: PairId, phase: Phase) {
        println!("{pair}  {}", Self::phase_banner(phase));
    }

    fn render_validation_error(&self, message: &str, field: Field) {
        eprintln!("{message} ({field})");
    }
}
