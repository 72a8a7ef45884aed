//! Dirty tracking for a single attribute.

use crate::core::State;
use serde::{Deserialize, Serialize};

/// An attribute value with its last persisted value alongside.
///
/// `assign` only touches the in-memory value; `commit` marks it persisted
/// and `rollback` throws it away.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Tracked<S: State> {
    persisted: Option<S>,
    current: Option<S>,
}

impl<S: State> Default for Tracked<S> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<S: State> Tracked<S> {
    /// Never assigned, never persisted.
    pub fn unset() -> Self {
        Self {
            persisted: None,
            current: None,
        }
    }

    /// A value loaded from storage.
    pub fn persisted(value: Option<S>) -> Self {
        Self {
            persisted: value.clone(),
            current: value,
        }
    }

    pub fn get(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn persisted_value(&self) -> Option<&S> {
        self.persisted.as_ref()
    }

    pub fn assign(&mut self, value: S) {
        self.current = Some(value);
    }

    pub fn rollback(&mut self) {
        self.current = self.persisted.clone();
    }

    pub fn commit(&mut self) {
        self.persisted = self.current.clone();
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.persisted
    }
}
