//! The state machine engine.
//!
//! - **Transitions**: (event, from) -> to rows with checks and callbacks
//! - **Transition table**: deterministic, exact-match resolution
//! - **State machine**: the frozen definition shared by all instances
//! - **Executor**: `fire`, `can_fire`, `permitted` and friends
//!
//! The engine is synchronous. A `fire` call runs to completion on the
//! calling thread and keeps nothing between calls.

mod definition;
mod executor;
mod transition;

pub use definition::{CommitHook, StateMachine};
pub use transition::{Callback, Transition, TransitionTable};
