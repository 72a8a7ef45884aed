//! Builder API for declaring state machines.
//!
//! This is the configuration surface of the crate: fluent builders and
//! macros collect the states, the initial state and the transitions of a
//! domain type, and `build()` freezes them into a
//! [`StateMachine`](crate::machine::StateMachine).

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::ConfigurationError;
pub use machine::{StateMachineBuilder, DEFAULT_ATTRIBUTE};
pub use transition::TransitionBuilder;

use crate::core::{Event, State};

/// Declare an unguarded transition.
///
/// # Example
///
/// ```
/// use stateable::builder::{simple_transition, StateMachineBuilder};
/// use stateable::{event_enum, state_enum};
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// event_enum! {
///     enum Signal {
///         Go,
///     }
/// }
///
/// struct Crossing;
///
/// let machine = StateMachineBuilder::<Light, Signal, Crossing>::new()
///     .states([Light::Red, Light::Green])
///     .initial(Light::Red)
///     .transition(simple_transition(Signal::Go, Light::Red, Light::Green))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.transitions().len(), 1);
/// ```
pub fn simple_transition<S, E, R>(event: E, from: S, to: S) -> TransitionBuilder<S, E, R>
where
    S: State,
    E: Event,
{
    TransitionBuilder::new(event).from(from).to(to)
}

/// Declare a transition gated by a single check.
pub fn guarded_transition<S, E, R, F>(
    event: E,
    from: S,
    to: S,
    description: impl Into<String>,
    predicate: F,
) -> TransitionBuilder<S, E, R>
where
    S: State,
    E: Event,
    F: Fn(&R) -> bool + Send + Sync + 'static,
{
    simple_transition(event, from, to).when(description, predicate)
}
