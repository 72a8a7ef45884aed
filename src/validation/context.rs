//! Context provided to validation checks.

use crate::core::State;

/// What a validation check sees: the record's data and the value of its
/// state attribute as it is about to be saved.
#[derive(Debug)]
pub struct ValidationContext<'a, T, S: State> {
    pub data: &'a T,
    /// `None` when the attribute was never assigned.
    pub state: Option<&'a S>,
}

impl<'a, T, S: State> ValidationContext<'a, T, S> {
    pub fn new(data: &'a T, state: Option<&'a S>) -> Self {
        Self { data, state }
    }

    /// Whether the record is being saved in `state`.
    pub fn is_in(&self, state: &S) -> bool {
        self.state == Some(state)
    }
}
