//! Core State trait for state machine states.
//!
//! A state is an opaque, comparable token drawn from the finite set a
//! machine registers. Persisted records hold one of these values in their
//! tracked attribute.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition records and history
/// - `PartialEq`: resolution is an exact match on the current state
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states are persisted with their record
/// - `Send` + `Sync`: a built machine is shared between threads
///
/// # Example
///
/// ```rust
/// use stateable::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum ArticleState {
///     Draft,
///     Published,
///     Archived,
/// }
///
/// impl State for ArticleState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Draft => "draft",
///             Self::Published => "published",
///             Self::Archived => "archived",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Archived)
///     }
/// }
///
/// assert_eq!(ArticleState::Draft.name(), "draft");
/// assert!(ArticleState::Archived.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display, logging and error messages.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Informational only: the engine does not refuse transitions out of a
    /// final state unless the table has no row for them.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Dynamically named states, for machines configured from data.
impl State for String {
    fn name(&self) -> &str {
        self
    }
}
