//! Opt-in capability for domain types.
//!
//! A domain type takes part by implementing [`Stateable`] and handing out
//! its machine from [`Stateable::state_machine`]. Types that return `None`
//! (or a machine with no states or transitions) are not enabled, and every
//! entry point reports that through [`NotEnabledError`] instead of acting.

use crate::core::{Event, State, StateTransition};
use crate::error::StateableError;
use crate::machine::StateMachine;
use crate::persistence::Persistence;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Name reported in [`NotEnabledError`].
pub const MODULE_NAME: &str = "Stateable";

/// The engine was used on a type that never configured a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", self.message())]
pub struct NotEnabledError {
    pub module_name: String,
    pub method_called: Option<String>,
    pub model_class: String,
}

impl NotEnabledError {
    pub fn new(module_name: impl Into<String>, model_class: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            method_called: None,
            model_class: model_class.into(),
        }
    }

    /// Record the method the caller invoked.
    pub fn called_from(mut self, method: impl Into<String>) -> Self {
        self.method_called = Some(method.into());
        self
    }

    pub fn message(&self) -> String {
        let mut message = format!(
            "{} is not enabled. Add '{}' to your model.",
            self.module_name,
            self.module_name.to_lowercase()
        );
        if let Some(method) = &self.method_called {
            message.push_str(&format!(" Called from `{method}`."));
        }
        message
    }
}

/// A domain type that may carry a state machine.
///
/// Only [`state_machine`](Self::state_machine) is required. The provided
/// methods pass through the enablement gate and then delegate to the
/// machine; they are available once the type also implements
/// [`Persistence`] for its state.
pub trait Stateable: Sized {
    type State: State;
    type Event: Event;

    /// The machine shared by every instance of this type, if configured.
    fn state_machine(&self) -> Option<Arc<StateMachine<Self::State, Self::Event, Self>>>;

    /// Name used in error messages.
    fn model_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Fire `event`, persisting the new state on success.
    fn fire(&mut self, event: Self::Event) -> Result<StateTransition<Self::State>, StateableError>
    where
        Self: Persistence<Self::State>,
    {
        let machine = assert_enabled(self, "fire")?;
        machine.fire(&event, self)
    }

    /// Whether `event` has a transition from the current state. Always
    /// `false` for a type that is not enabled.
    fn can_fire(&self, event: &Self::Event) -> bool
    where
        Self: Persistence<Self::State>,
    {
        match assert_enabled(self, "can_fire") {
            Ok(machine) => machine.can_fire(event, self),
            Err(_) => false,
        }
    }

    /// Whether `event` would pass resolution and its checks right now.
    fn permitted(&self, event: &Self::Event) -> Result<bool, StateableError>
    where
        Self: Persistence<Self::State>,
    {
        let machine = assert_enabled(self, "permitted")?;
        machine
            .permitted(event, self)
            .map_err(|fault| StateableError::CheckFault {
                event: event.name().to_string(),
                fault,
            })
    }

    fn current_state(&self) -> Result<Self::State, NotEnabledError>
    where
        Self: Persistence<Self::State>,
    {
        let machine = assert_enabled(self, "current_state")?;
        Ok(machine.current_state(self))
    }

    /// Events that can fire from the current state.
    fn available_events(&self) -> Result<Vec<Self::Event>, NotEnabledError>
    where
        Self: Persistence<Self::State>,
    {
        let machine = assert_enabled(self, "available_events")?;
        Ok(machine.available_events(self))
    }
}

/// The enablement gate: hand back the instance's machine, or fail if the
/// type has no usable one.
pub fn assert_enabled<T: Stateable>(
    instance: &T,
    method: &str,
) -> Result<Arc<StateMachine<T::State, T::Event, T>>, NotEnabledError> {
    match instance.state_machine() {
        Some(machine) if machine.is_enabled() => Ok(machine),
        _ => {
            debug!(
                model = instance.model_name(),
                method, "state machine not enabled"
            );
            Err(NotEnabledError::new(MODULE_NAME, instance.model_name()).called_from(method))
        }
    }
}
