//! Window focus requests.
//!
//! When a work phase ends the widget asks to be brought to the front. The
//! headless build rings the terminal bell instead.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Trait for raising the widget above other windows.
pub trait WindowController {
    fn bring_to_front(&self);
}

/// Window controller for terminals: rings the bell and prints a banner.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl WindowController for TerminalBell {
    fn bring_to_front(&self) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "\x07*** time for a break ***").and_then(|()| stdout.flush()) {
            debug!(error = %e, "Could not write to terminal");
        }
    }
}

/// Mock window controller for testing.
#[derive(Debug, Default)]
pub struct MockWindowController {
    raised: AtomicUsize,
}

impl MockWindowController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raise_count(&self) -> usize {
        self.raised.load(Ordering::SeqCst)
    }
}

impl WindowController for MockWindowController {
    fn bring_to_front(&self) {
        self.raised.fetch_add(1, Ordering::SeqCst);
    }
}
