//! Record validation with accumulated failures.
//!
//! Rules are plain checks over a [`ValidationContext`]; running them uses
//! Stillwater's `Validation` so that every failure is reported at once
//! instead of stopping at the first. The reference collaborator runs them
//! in `save`, and a failure there is what turns into
//! [`StateableError::ValidationFailed`](crate::StateableError::ValidationFailed).
//!
//! # Example
//!
//! ```rust
//! use stateable::validation::{ValidationBuilder, ValidationContext, ValidationRules};
//! use stateable::state_enum;
//!
//! state_enum! {
//!     enum ArticleState {
//!         Draft,
//!         Published,
//!     }
//! }
//!
//! struct Article {
//!     title: String,
//! }
//!
//! let rules: ValidationRules<Article, ArticleState> = ValidationBuilder::new()
//!     .presence("title", |a: &Article| a.title.as_str())
//!     .build();
//!
//! let article = Article { title: String::new() };
//! assert!(rules.validate(&ValidationContext::new(&article, None)).is_failure());
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::ValidationBuilder;
pub use context::ValidationContext;
pub use rules::{ValidationCheck, ValidationRules};
pub use violations::ValidationError;
