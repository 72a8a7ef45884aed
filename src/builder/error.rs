//! Configuration errors raised while declaring a state machine.

use thiserror::Error;

/// Malformed state or transition declarations.
///
/// These surface while the machine is being built, never while firing
/// events; a machine that builds is well-formed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No states registered. Call .state(state) or .states([..]) before .build()")]
    NoStates,

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{state}' is not a registered state")]
    UnregisteredInitialState { state: String },

    #[error("State '{state}' is registered more than once")]
    DuplicateState { state: String },

    #[error("Event '{event}' references unregistered state '{state}'")]
    UnregisteredState { event: String, state: String },

    #[error("Event '{event}' already has a transition from state '{from}'")]
    DuplicateTransition { event: String, from: String },

    #[error("Transition for event '{event}' has no source state. Call .from(state)")]
    MissingFromState { event: String },

    #[error("Transition for event '{event}' has no target state. Call .to(state)")]
    MissingToState { event: String },

    #[error("Tracked attribute name must not be empty")]
    EmptyAttribute,
}
