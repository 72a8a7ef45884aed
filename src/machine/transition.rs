//! Transitions and the table that resolves them.

use crate::builder::ConfigurationError;
use crate::core::{Check, Event, State, StateRegistry, StateTransition};
use crate::error::HookError;
use std::fmt;
use std::sync::Arc;

/// Post-commit hook attached to a single transition.
///
/// Callbacks run only after the new state has been saved. They receive the
/// instance mutably and the committed transition record.
pub type Callback<S, R> =
    Arc<dyn Fn(&mut R, &StateTransition<S>) -> Result<(), HookError> + Send + Sync>;

/// A registered (event, from) -> to row with its checks and callbacks.
pub struct Transition<S: State, E: Event, R> {
    pub(crate) event: E,
    pub(crate) from: S,
    pub(crate) to: S,
    pub(crate) checks: Vec<Check<R>>,
    pub(crate) callbacks: Vec<Callback<S, R>>,
}

impl<S: State, E: Event, R> Transition<S, E, R> {
    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn from(&self) -> &S {
        &self.from
    }

    pub fn to(&self) -> &S {
        &self.to
    }

    pub fn checks(&self) -> &[Check<R>] {
        &self.checks
    }

    pub fn callbacks(&self) -> &[Callback<S, R>] {
        &self.callbacks
    }

    /// Whether this row answers `event` fired from `current`.
    pub fn matches(&self, event: &E, current: &S) -> bool {
        self.event == *event && self.from == *current
    }
}

impl<S: State, E: Event, R> Clone for Transition<S, E, R> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            checks: self.checks.clone(),
            callbacks: self.callbacks.iter().map(Arc::clone).collect(),
        }
    }
}

impl<S: State, E: Event, R> fmt::Debug for Transition<S, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("event", &self.event)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("checks", &self.checks)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Maps (event, from-state) to a single transition.
///
/// Lookup is an exact match; there are no wildcard rows. Registering a
/// second row for the same (event, from) pair is rejected.
pub struct TransitionTable<S: State, E: Event, R> {
    transitions: Vec<Transition<S, E, R>>,
}

impl<S: State, E: Event, R> Default for TransitionTable<S, E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, R> TransitionTable<S, E, R> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Add a row after checking its states against `registry`.
    pub fn register(
        &mut self,
        transition: Transition<S, E, R>,
        registry: &StateRegistry<S>,
    ) -> Result<(), ConfigurationError> {
        for state in [&transition.from, &transition.to] {
            if !registry.is_valid(state) {
                return Err(ConfigurationError::UnregisteredState {
                    event: transition.event.name().to_string(),
                    state: state.name().to_string(),
                });
            }
        }

        if self.resolve(&transition.event, &transition.from).is_some() {
            return Err(ConfigurationError::DuplicateTransition {
                event: transition.event.name().to_string(),
                from: transition.from.name().to_string(),
            });
        }

        self.transitions.push(transition);
        Ok(())
    }

    /// Find the row for `event` fired from `current`.
    pub fn resolve(&self, event: &E, current: &S) -> Option<&Transition<S, E, R>> {
        self.transitions.iter().find(|t| t.matches(event, current))
    }

    /// Distinct events in the order they were first registered.
    pub fn events(&self) -> Vec<&E> {
        let mut events: Vec<&E> = Vec::new();
        for transition in &self.transitions {
            if !events.contains(&&transition.event) {
                events.push(&transition.event);
            }
        }
        events
    }

    /// Rows leaving `state`, in registration order.
    pub fn from_state<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a Transition<S, E, R>> {
        self.transitions.iter().filter(move |t| t.from == *state)
    }

    pub fn transitions(&self) -> &[Transition<S, E, R>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
