//! Validation rules for records using stillwater's `Validation`.

use crate::core::State;
use crate::validation::context::ValidationContext;
use crate::validation::violations::ValidationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck<T, S> = Box<
    dyn for<'a> Fn(&ValidationContext<'a, T, S>) -> Validation<(), NonEmptyVec<ValidationError>>
        + Send
        + Sync,
>;

/// Rules a record must satisfy before it is saved.
/// Uses Validation to accumulate ALL failures.
pub struct ValidationRules<T, S: State> {
    pub(crate) checks: Vec<ValidationCheck<T, S>>,
}

impl<T, S: State> Default for ValidationRules<T, S> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, S: State> ValidationRules<T, S> {
    /// Rules that accept every record.
    pub fn none() -> Self {
        Self { checks: Vec::new() }
    }

    /// Run every check, accumulating ALL failures.
    pub fn validate(
        &self,
        context: &ValidationContext<'_, T, S>,
    ) -> Validation<(), NonEmptyVec<ValidationError>> {
        let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> =
            self.checks.iter().map(|check| check(context)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
