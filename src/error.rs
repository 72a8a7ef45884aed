//! Errors raised when firing events.

use crate::builder::ConfigurationError;
use crate::core::CheckFault;
use crate::enablement::NotEnabledError;
use crate::persistence::ValidationErrors;
use thiserror::Error;

/// Error type returned by fallible checks and callbacks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything `fire` can report.
///
/// `InvalidTransition`, `CheckFailed` and `ValidationFailed` are expected
/// business-rule rejections; the caller decides what to do with them.
/// `CheckFault` and `CallbackFailed` carry an unexpected error from user
/// code untouched in `source`.
#[derive(Debug, Error)]
pub enum StateableError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    NotEnabled(#[from] NotEnabledError),

    /// No row for (event, current state). Unknown events and events fired
    /// from the wrong state are not told apart.
    #[error("Cannot fire event '{event}' from state '{from}'")]
    InvalidTransition { event: String, from: String },

    /// A check rejected the transition; nothing was mutated.
    #[error("Event '{event}' rejected: {description}")]
    CheckFailed { event: String, description: String },

    /// The collaborator refused to save; the state attribute was reverted.
    #[error("Event '{event}' failed validation: {errors}")]
    ValidationFailed {
        event: String,
        errors: ValidationErrors,
    },

    #[error("Check faulted while firing '{event}'")]
    CheckFault {
        event: String,
        #[source]
        fault: CheckFault,
    },

    /// A callback failed after the transition was committed. The new state
    /// stays persisted.
    #[error("Callback failed after '{event}' committed ({from} -> {to})")]
    CallbackFailed {
        event: String,
        from: String,
        to: String,
        #[source]
        source: HookError,
    },
}

impl StateableError {
    /// Whether this is an ordinary rejection of the requested action rather
    /// than a defect.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::CheckFailed { .. } | Self::ValidationFailed { .. }
        )
    }

    /// Name of the event involved, when there is one.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) | Self::NotEnabled(_) => None,
            Self::InvalidTransition { event, .. }
            | Self::CheckFailed { event, .. }
            | Self::ValidationFailed { event, .. }
            | Self::CheckFault { event, .. }
            | Self::CallbackFailed { event, .. } => Some(event),
        }
    }
}
