//! Engine error types.
//!
//! All engine errors are recoverable: the widget stays interactive and the
//! running timers are left as they were.

use thiserror::Error;

use super::registry::PairHandle;
use crate::types::Field;

/// Message shown next to a rejected delay field.
pub const INVALID_DELAY_MESSAGE: &str = "Please correct delay value";

/// A user-supplied duration was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more durations are zero or too long to store.
    #[error("Please correct delay value: {}", fields_list(.fields))]
    NonPositive { fields: Vec<Field> },
}

impl ValidationError {
    /// Fields the user has to correct.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match self {
            Self::NonPositive { fields } => fields,
        }
    }
}

fn fields_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by handle-addressed registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no timer pair {0}")]
    UnknownPair(PairHandle),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
