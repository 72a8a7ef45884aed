//! Core state machine types.
//!
//! - States and events via the `State` and `Event` traits
//! - The registry of legal states
//! - Check predicates and their fail-fast evaluation
//! - Transition records and history
//!
//! Nothing in this module touches persistence; the executor in
//! [`crate::machine`] composes these pieces with the collaborator.

mod check;
mod event;
mod history;
mod registry;
mod state;

pub use check::{evaluate, Check, CheckFault, CheckOutcome};
pub use event::Event;
pub use history::{StateHistory, StateTransition};
pub use registry::StateRegistry;
pub use state::State;
