//! Builder for declaring the transitions of one event.

use crate::builder::error::ConfigurationError;
use crate::core::{Check, Event, State, StateTransition};
use crate::error::HookError;
use crate::machine::{Callback, Transition};
use std::sync::Arc;

/// Builder for the transitions an event performs.
///
/// `.from()` may be called several times; each source state becomes its own
/// row in the table, sharing the target, checks and callbacks.
pub struct TransitionBuilder<S: State, E: Event, R> {
    event: E,
    from: Vec<S>,
    to: Option<S>,
    checks: Vec<Check<R>>,
    callbacks: Vec<Callback<S, R>>,
}

impl<S: State, E: Event, R> TransitionBuilder<S, E, R> {
    /// Start declaring transitions for `event`.
    pub fn new(event: E) -> Self {
        Self {
            event,
            from: Vec::new(),
            to: None,
            checks: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// Add a source state (at least one is required).
    pub fn from(mut self, state: S) -> Self {
        self.from.push(state);
        self
    }

    /// Add several source states at once.
    pub fn from_each(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.from.extend(states);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Add a check. Checks run in the order they are added.
    pub fn check(mut self, check: Check<R>) -> Self {
        self.checks.push(check);
        self
    }

    /// Add a check using a closure.
    pub fn when<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Check::new(description, predicate));
        self
    }

    /// Add a post-commit callback that may fail.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut R, &StateTransition<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
        self
    }

    /// Add a post-commit callback that cannot fail.
    pub fn after<F>(self, callback: F) -> Self
    where
        F: Fn(&mut R, &StateTransition<S>) + Send + Sync + 'static,
    {
        self.callback(move |instance, transition| {
            callback(instance, transition);
            Ok(())
        })
    }

    /// Build one transition per source state.
    pub fn build(self) -> Result<Vec<Transition<S, E, R>>, ConfigurationError> {
        if self.from.is_empty() {
            return Err(ConfigurationError::MissingFromState {
                event: self.event.name().to_string(),
            });
        }
        let to = self.to.ok_or_else(|| ConfigurationError::MissingToState {
            event: self.event.name().to_string(),
        })?;

        Ok(self
            .from
            .into_iter()
            .map(|from| Transition {
                event: self.event.clone(),
                from,
                to: to.clone(),
                checks: self.checks.clone(),
                callbacks: self.callbacks.iter().map(Arc::clone).collect(),
            })
            .collect())
    }
}
