//! Rendering of timer state.
//!
//! The engine never draws anything itself. Every visible change goes through
//! the [`Renderer`] trait:
//!
//! - remaining time of a single timer
//! - progress of a pair's current phase
//! - work/break styling of a pair
//! - validation errors on the settings form

mod terminal;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::types::{Field, PairId, Phase, TimerId};

pub use terminal::TerminalRenderer;

/// Trait for drawing timer state.
pub trait Renderer {
    /// Shows the remaining time of one timer.
    fn render_remaining(&self, timer: TimerId, remaining: Duration);

    /// Shows the remaining share of the current phase, 0-100.
    fn render_progress(&self, pair: PairId, percent: u8);

    /// Switches a pair between work and break styling.
    fn set_visual_phase(&self, pair: PairId, phase: Phase);

    /// Surfaces a rejected settings value to the user.
    fn render_validation_error(&self, message: &str, field: Field);
}

/// One recorded call on a [`MockRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Remaining { timer: TimerId, remaining: Duration },
    Progress { pair: PairId, percent: u8 },
    VisualPhase { pair: PairId, phase: Phase },
    ValidationError { message: String, field: Field },
}

/// Renderer that records every call, for tests.
#[derive(Debug, Default)]
pub struct MockRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl MockRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.lock().clone()
    }

    /// Last remaining time rendered for `timer`.
    #[must_use]
    pub fn last_remaining(&self, timer: TimerId) -> Option<Duration> {
        self.lock().iter().rev().find_map(|call| match call {
            RenderCall::Remaining { timer: t, remaining } if *t == timer => Some(*remaining),
            _ => None,
        })
    }

    /// Last visual phase set for `pair`.
    #[must_use]
    pub fn last_phase(&self, pair: PairId) -> Option<Phase> {
        self.lock().iter().rev().find_map(|call| match call {
            RenderCall::VisualPhase { pair: p, phase } if *p == pair => Some(*phase),
            _ => None,
        })
    }

    /// Validation errors rendered so far.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<(String, Field)> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::ValidationError { message, field } => {
                    Some((message.clone(), *field))
                }
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RenderCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: RenderCall) {
        self.lock().push(call);
    }
}

impl Renderer for MockRenderer {
    fn render_remaining(&self, timer: TimerId, remaining: Duration) {
        self.record(RenderCall::Remaining { timer, remaining });
    }

    fn render_progress(&self, pair: PairId, percent: u8) {
        self.record(RenderCall::Progress { pair, percent });
    }

    fn set_visual_phase(&self, pair: PairId, phase: Phase) {
        self.record(RenderCall::VisualPhase { pair, phase });
    }

    fn render_validation_error(&self, message: &str, field: Field) {
        self.record(RenderCall::ValidationError {
            message: message.to_string(),
            field,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_in_order() {
        let mock = MockRenderer::new();
        let timer = TimerId::next();
        let pair = PairId::next();

        mock.render_remaining(timer, Duration::from_secs(3));
        mock.set_visual_phase(pair, Phase::Break);
        mock.render_progress(pair, 50);

        assert_eq!(
            mock.calls(),
            vec![
                RenderCall::Remaining {
                    timer,
                    remaining: Duration::from_secs(3)
                },
                RenderCall::VisualPhase {
                    pair,
                    phase: Phase::Break
                },
                RenderCall::Progress { pair, percent: 50 },
            ]
        );
    }

    #[test]
    fn test_mock_lookups() {
        let mock = MockRenderer::new();
        let timer = TimerId::next();
        let pair = PairId::next();

        mock.render_remaining(timer, Duration::from_secs(3));
        mock.render_remaining(timer, Duration::from_secs(2));
        mock.set_visual_phase(pair, Phase::Break);
        mock.set_visual_phase(pair, Phase::Work);
        mock.render_validation_error("bad", Field::WorkDelay);

        assert_eq!(mock.last_remaining(timer), Some(Duration::from_secs(2)));
        assert_eq!(mock.last_phase(pair), Some(Phase::Work));
        assert_eq!(
            mock.validation_errors(),
            vec![("bad".to_string(), Field::WorkDelay)]
        );

        mock.clear_calls();
        assert!(mock.calls().is_empty());
    }
}
