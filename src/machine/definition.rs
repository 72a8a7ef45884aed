//! The immutable, shareable state machine definition.

use crate::core::{Event, State, StateRegistry, StateTransition};
use crate::machine::transition::{Transition, TransitionTable};
use std::fmt;
use std::sync::Arc;

/// Machine-wide hook run after every committed transition, before the
/// transition's own callbacks. This is where an audit trail is recorded.
pub type CommitHook<S, R> = Arc<dyn Fn(&mut R, &StateTransition<S>) + Send + Sync>;

/// A built state machine: registry, transition table and tracked attribute.
///
/// Built once per domain type with
/// [`StateMachineBuilder`](crate::builder::StateMachineBuilder) and shared
/// by reference (usually an `Arc`) with every instance of that type. It
/// holds no per-instance state; the current state always lives in the
/// instance's tracked attribute.
pub struct StateMachine<S: State, E: Event, R> {
    pub(crate) attribute: String,
    pub(crate) initial: S,
    pub(crate) registry: StateRegistry<S>,
    pub(crate) table: TransitionTable<S, E, R>,
    pub(crate) commit_hooks: Vec<CommitHook<S, R>>,
}

impl<S: State, E: Event, R> StateMachine<S, E, R> {
    /// Name of the attribute the state is stored in.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn registry(&self) -> &StateRegistry<S> {
        &self.registry
    }

    pub fn table(&self) -> &TransitionTable<S, E, R> {
        &self.table
    }

    /// Registered states in declaration order.
    pub fn states(&self) -> &[S] {
        self.registry.states()
    }

    /// The state an instance has before its attribute is ever assigned.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn transitions(&self) -> &[Transition<S, E, R>] {
        self.table.transitions()
    }

    /// Distinct events, in registration order.
    pub fn events(&self) -> Vec<&E> {
        self.table.events()
    }

    /// Usable by the enablement gate: at least one state and one transition.
    pub fn is_enabled(&self) -> bool {
        !self.registry.is_empty() && !self.table.is_empty()
    }

    pub(crate) fn commit_hooks(&self) -> &[CommitHook<S, R>] {
        &self.commit_hooks
    }
}

impl<S: State, E: Event, R> fmt::Debug for StateMachine<S, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("attribute", &self.attribute)
            .field("states", &self.registry.states())
            .field("initial", &self.initial)
            .field("transitions", &self.table.transitions())
            .field("commit_hooks", &self.commit_hooks.len())
            .finish()
    }
}
