//! Builder for constructing state machines.

use crate::builder::error::ConfigurationError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State, StateRegistry, StateTransition};
use crate::machine::{CommitHook, StateMachine, TransitionTable};
use std::sync::Arc;

/// Attribute a machine tracks unless told otherwise.
pub const DEFAULT_ATTRIBUTE: &str = "state";

/// Builder for constructing state machines with a fluent API.
///
/// Declarations are collected and validated by [`build`](Self::build) in
/// the order they were made: states first, then the initial state, then
/// every transition against the registered states.
pub struct StateMachineBuilder<S: State, E: Event, R> {
    attribute: String,
    states: Vec<S>,
    initial: Option<S>,
    transitions: Vec<TransitionBuilder<S, E, R>>,
    commit_hooks: Vec<CommitHook<S, R>>,
}

impl<S: State, E: Event, R> StateMachineBuilder<S, E, R> {
    pub fn new() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            states: Vec::new(),
            initial: None,
            transitions: Vec::new(),
            commit_hooks: Vec::new(),
        }
    }

    /// Name of the attribute holding the state (default `"state"`).
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = name.into();
        self
    }

    /// Declare a legal state.
    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    /// Declare several legal states, in order.
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Set the initial state (required, must be declared).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add the transitions of one event.
    pub fn transition(mut self, builder: TransitionBuilder<S, E, R>) -> Self {
        self.transitions.push(builder);
        self
    }

    /// Add several transition builders at once.
    pub fn transitions(mut self, builders: impl IntoIterator<Item = TransitionBuilder<S, E, R>>) -> Self {
        self.transitions.extend(builders);
        self
    }

    /// Run `hook` after every committed transition, before the
    /// transition's own callbacks.
    pub fn on_commit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut R, &StateTransition<S>) + Send + Sync + 'static,
    {
        self.commit_hooks.push(Arc::new(hook));
        self
    }

    /// Build the state machine.
    ///
    /// A machine without transitions builds, but the enablement gate treats
    /// it as not enabled.
    pub fn build(self) -> Result<StateMachine<S, E, R>, ConfigurationError> {
        if self.attribute.is_empty() {
            return Err(ConfigurationError::EmptyAttribute);
        }

        let mut registry = StateRegistry::new();
        for state in self.states {
            registry.register(state)?;
        }
        if let Some(initial) = self.initial {
            registry.set_initial(initial)?;
        }
        let initial = registry.initial_state()?.clone();

        let mut table = TransitionTable::new();
        for builder in self.transitions {
            for transition in builder.build()? {
                table.register(transition, &registry)?;
            }
        }

        Ok(StateMachine {
            attribute: self.attribute,
            initial,
            registry,
            table,
            commit_hooks: self.commit_hooks,
        })
    }
}

impl<S: State, E: Event, R> Default for StateMachineBuilder<S, E, R> {
    fn default() -> Self {
        Self::new()
    }
}
