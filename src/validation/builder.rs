//! Builder API for creating validation rules.

use crate::core::State;
use crate::validation::context::ValidationContext;
use crate::validation::rules::ValidationRules;
use crate::validation::violations::ValidationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating validation rules
pub struct ValidationBuilder<T, S: State> {
    rules: ValidationRules<T, S>,
}

impl<T, S: State> ValidationBuilder<T, S> {
    pub fn new() -> Self {
        Self {
            rules: ValidationRules::none(),
        }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: for<'a> Fn(&ValidationContext<'a, T, S>) -> Validation<(), NonEmptyVec<ValidationError>>
            + Send
            + Sync
            + 'static,
    {
        self.rules.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate over the data with an error message
    pub fn require_pred<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.require(move |ctx| {
            if predicate(ctx.data) {
                Validation::success(())
            } else {
                Validation::fail(ValidationError::Custom {
                    message: message.clone(),
                })
            }
        })
    }

    /// Require a string field to contain something other than whitespace
    pub fn presence<F>(self, field: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        let field = field.into();
        self.require(move |ctx| {
            if accessor(ctx.data).trim().is_empty() {
                Validation::fail(ValidationError::Blank {
                    field: field.clone(),
                })
            } else {
                Validation::success(())
            }
        })
    }

    pub fn build(self) -> ValidationRules<T, S> {
        self.rules
    }
}

impl<T, S: State> Default for ValidationBuilder<T, S> {
    fn default() -> Self {
        Self::new()
    }
}
