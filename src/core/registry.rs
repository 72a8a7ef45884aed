//! Registry of the legal states of a machine.

use super::state::State;
use crate::builder::ConfigurationError;

/// Ordered, append-only set of legal states plus the designated initial
/// state.
///
/// The registry is filled while a machine is being configured and frozen
/// inside the built [`StateMachine`](crate::machine::StateMachine); after
/// that it is only read.
#[derive(Clone, Debug)]
pub struct StateRegistry<S: State> {
    states: Vec<S>,
    initial: Option<S>,
}

impl<S: State> Default for StateRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateRegistry<S> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
        }
    }

    /// Register a legal state. Registering the same state twice is a
    /// configuration defect.
    pub fn register(&mut self, state: S) -> Result<(), ConfigurationError> {
        if self.is_valid(&state) {
            return Err(ConfigurationError::DuplicateState {
                state: state.name().to_string(),
            });
        }
        self.states.push(state);
        Ok(())
    }

    /// Designate the initial state. It must already be registered.
    pub fn set_initial(&mut self, state: S) -> Result<(), ConfigurationError> {
        if !self.is_valid(&state) {
            return Err(ConfigurationError::UnregisteredInitialState {
                state: state.name().to_string(),
            });
        }
        self.initial = Some(state);
        Ok(())
    }

    pub fn is_valid(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// The state an instance holds before its first transition.
    pub fn initial_state(&self) -> Result<&S, ConfigurationError> {
        if self.states.is_empty() {
            return Err(ConfigurationError::NoStates);
        }
        self.initial
            .as_ref()
            .ok_or(ConfigurationError::MissingInitialState)
    }

    /// States in registration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
