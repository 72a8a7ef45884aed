//! Stateable: declarative state machines for persistent domain objects.
//!
//! A domain type declares its states, its initial state and the events
//! that move it between them. Events are fired against an instance; the
//! engine resolves the transition for the current state, runs its checks,
//! assigns and saves the new state through the persistence collaborator,
//! then runs post-commit callbacks. An instance never ends a `fire` call
//! holding a state that was not saved.
//!
//! # Core Concepts
//!
//! - **State** / **Event**: typed tokens via the `State` and `Event` traits
//! - **Checks**: ordered guard predicates evaluated before any mutation
//! - **StateMachine**: the immutable definition shared by every instance
//! - **Persistence**: the attribute/save/rollback contract the engine drives
//! - **Stateable**: the opt-in capability with its enablement gate
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use stateable::builder::{StateMachineBuilder, TransitionBuilder};
//! use stateable::persistence::{MemoryStore, Record};
//! use stateable::{event_enum, state_enum, Stateable, StateableError};
//!
//! state_enum! {
//!     pub enum ArticleState {
//!         Draft,
//!         Published,
//!         Archived,
//!     }
//!     final: [Archived]
//! }
//!
//! event_enum! {
//!     pub enum ArticleEvent {
//!         Publish,
//!         Archive,
//!     }
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! struct Article {
//!     title: String,
//!     view_count: u32,
//! }
//!
//! type ArticleRecord = Record<Article, ArticleState, ArticleEvent>;
//!
//! let machine = StateMachineBuilder::new()
//!     .states([ArticleState::Draft, ArticleState::Published, ArticleState::Archived])
//!     .initial(ArticleState::Draft)
//!     .transition(
//!         TransitionBuilder::new(ArticleEvent::Publish)
//!             .from(ArticleState::Draft)
//!             .to(ArticleState::Published),
//!     )
//!     .transition(
//!         TransitionBuilder::new(ArticleEvent::Archive)
//!             .from(ArticleState::Published)
//!             .to(ArticleState::Archived)
//!             .when("must have view_count > 0", |a: &ArticleRecord| a.view_count > 0),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let store = MemoryStore::new("Article").with_machine(machine);
//! let mut article = store.create(Article { title: "Hello".into(), view_count: 0 });
//!
//! article.fire(ArticleEvent::Publish).unwrap();
//! assert_eq!(article.current_state().unwrap(), ArticleState::Published);
//!
//! let err = article.fire(ArticleEvent::Archive).unwrap_err();
//! assert!(matches!(err, StateableError::CheckFailed { .. }));
//! assert_eq!(article.current_state().unwrap(), ArticleState::Published);
//! ```

pub mod builder;
pub mod core;
pub mod enablement;
pub mod error;
pub mod machine;
pub mod persistence;
pub mod validation;

// Re-export commonly used types
pub use builder::{ConfigurationError, StateMachineBuilder, TransitionBuilder};
pub use core::{Check, Event, State, StateHistory, StateTransition};
pub use enablement::{NotEnabledError, Stateable};
pub use error::{HookError, StateableError};
pub use machine::StateMachine;
pub use persistence::{Persistence, ValidationErrors};
