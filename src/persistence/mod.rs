//! The persistence collaborator the engine drives.
//!
//! The engine never stores anything itself. It reads and assigns the state
//! attribute, asks the collaborator to save, and asks it to roll an unsaved
//! assignment back when the save is refused. Any record layer can take part
//! by implementing [`Persistence`]; [`memory`] is an in-process reference
//! implementation.

pub mod error;
pub mod memory;
mod tracked;

pub use error::StoreError;
pub use memory::{MemoryStore, Record};
pub use tracked::Tracked;

use crate::core::State;
use crate::validation::ValidationError;
use std::fmt;
use stillwater::NonEmptyVec;

/// Attribute-level persistence operations the engine needs.
pub trait Persistence<S: State> {
    /// Value of `attribute`, or `None` if it was never assigned.
    fn current_value(&self, attribute: &str) -> Option<S>;

    /// Assign `attribute` in memory. Nothing is persisted until `save`.
    fn assign(&mut self, attribute: &str, state: S);

    /// Persist the record. A refusal carries the reasons in order.
    fn save(&mut self) -> Result<(), ValidationErrors>;

    /// Revert an unsaved assignment of `attribute`.
    fn rollback(&mut self, attribute: &str);
}

/// Ordered, human-readable reasons a save was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new(messages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join(", "))
    }
}

impl From<NonEmptyVec<ValidationError>> for ValidationErrors {
    fn from(errors: NonEmptyVec<ValidationError>) -> Self {
        Self::new(errors.iter().map(|e| e.to_string()))
    }
}
