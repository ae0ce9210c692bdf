//! Widget runtime
//!
//! Drives the engine from three sources: the clock ticker, presence changes
//! and user commands.

mod command;
mod runtime;

pub use command::{CommandError, WidgetCommand};
pub use runtime::{Widget, WidgetError};
