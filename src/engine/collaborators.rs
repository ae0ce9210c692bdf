//! External side-effect sinks handed to every timer pair.

use std::fmt;
use std::sync::Arc;

use crate::render::{MockRenderer, Renderer};
use crate::sound::{AlertPlayer, MockAlertPlayer};
use crate::window::{MockWindowController, WindowController};

/// Renderer, alert player and window controller shared by all pairs.
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Arc<dyn Renderer>,
    pub alert: Arc<dyn AlertPlayer>,
    pub window: Arc<dyn WindowController>,
}

impl Collaborators {
    pub fn new(
        renderer: Arc<dyn Renderer>,
        alert: Arc<dyn AlertPlayer>,
        window: Arc<dyn WindowController>,
    ) -> Self {
        Self {
            renderer,
            alert,
            window,
        }
    }

    /// Builds collaborators from mocks, returning the mocks for inspection.
    pub fn mocked() -> (
        Self,
        Arc<MockRenderer>,
        Arc<MockAlertPlayer>,
        Arc<MockWindowController>,
    ) {
        let renderer = Arc::new(MockRenderer::new());
        let alert = Arc::new(MockAlertPlayer::new());
        let window = Arc::new(MockWindowController::new());
        let collaborators = Self::new(
            Arc::clone(&renderer) as Arc<dyn Renderer>,
            Arc::clone(&alert) as Arc<dyn AlertPlayer>,
            Arc::clone(&window) as Arc<dyn WindowController>,
        );
        (collaborators, renderer, alert, window)
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
