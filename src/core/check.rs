//! Check (guard) predicates and their evaluation.
//!
//! Checks gate a transition: they run against the instance before anything
//! is mutated, in registration order, and the first rejection stops the
//! evaluation.

use crate::error::HookError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

type Predicate<R> = Arc<dyn Fn(&R) -> Result<bool, HookError> + Send + Sync>;

/// Predicate over a domain object that must hold for a transition to fire.
///
/// Checks must not mutate the instance; they only ever receive `&R`. The
/// description is what callers see when the check rejects a transition.
///
/// # Example
///
/// ```rust
/// use stateable::core::Check;
///
/// struct Article {
///     view_count: u32,
/// }
///
/// let has_views = Check::new("must have view_count > 0", |a: &Article| a.view_count > 0);
///
/// assert!(has_views.check(&Article { view_count: 3 }).unwrap());
/// assert!(!has_views.check(&Article { view_count: 0 }).unwrap());
/// assert_eq!(has_views.description(), "must have view_count > 0");
/// ```
pub struct Check<R> {
    description: String,
    predicate: Predicate<R>,
}

impl<R> Check<R> {
    /// Create a check from an infallible predicate.
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(move |instance| Ok(predicate(instance))),
        }
    }

    /// Create a check whose predicate can fail for reasons other than
    /// rejecting the transition (a lookup that errors, say).
    ///
    /// An `Err` is reported as a [`CheckFault`], never as a rejection.
    pub fn fallible<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&R) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn check(&self, instance: &R) -> Result<bool, HookError> {
        (self.predicate)(instance)
    }
}

impl<R> Clone for Check<R> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<R> fmt::Debug for Check<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Outcome of running a transition's checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Every check held.
    Passed,

    /// The first check that rejected the transition.
    Failed { description: String },
}

/// A check that could not be evaluated at all.
#[derive(Debug, Error)]
#[error("Check '{description}' could not be evaluated: {source}")]
pub struct CheckFault {
    pub description: String,
    #[source]
    pub source: HookError,
}

/// Evaluate `checks` against `instance` in order, stopping at the first one
/// that rejects or faults.
pub fn evaluate<R>(checks: &[Check<R>], instance: &R) -> Result<CheckOutcome, CheckFault> {
    for check in checks {
        let passed = check.check(instance).map_err(|source| CheckFault {
            description: check.description.clone(),
            source,
        })?;

        if !passed {
            return Ok(CheckOutcome::Failed {
                description: check.description.clone(),
            });
        }
    }

    Ok(CheckOutcome::Passed)
}
