//! Validation failures reported for a record.

use thiserror::Error;

/// A single reason a record cannot be saved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} can't be blank")]
    Blank { field: String },

    #[error("{field} is not allowed while {state}")]
    NotAllowedInState { field: String, state: String },

    #[error("{message}")]
    Custom { message: String },
}
