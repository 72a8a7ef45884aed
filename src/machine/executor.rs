//! Firing events against an instance.
//!
//! A `fire` call walks a fixed protocol: resolve the row for the current
//! state, run its checks, assign the new state, save, then run the
//! post-commit hooks. Any failure before the save completes leaves the
//! instance holding the state it had when the call started.

use crate::core::{evaluate, CheckFault, CheckOutcome, Event, State, StateTransition};
use crate::enablement::{NotEnabledError, MODULE_NAME};
use crate::error::StateableError;
use crate::machine::definition::StateMachine;
use crate::persistence::Persistence;
use chrono::Utc;
use tracing::{debug, info, warn};

impl<S, E, R> StateMachine<S, E, R>
where
    S: State,
    E: Event,
    R: Persistence<S>,
{
    /// Current state of `instance`, falling back to the initial state when
    /// the attribute has never been assigned.
    pub fn current_state(&self, instance: &R) -> S {
        instance
            .current_value(&self.attribute)
            .unwrap_or_else(|| self.initial.clone())
    }

    /// Whether `event` has a row for the instance's current state.
    ///
    /// Checks are not evaluated and nothing is mutated.
    pub fn can_fire(&self, event: &E, instance: &R) -> bool {
        let current = self.current_state(instance);
        self.table.resolve(event, &current).is_some()
    }

    /// Like [`can_fire`](Self::can_fire), but also evaluates the row's
    /// checks. Still free of side effects.
    pub fn permitted(&self, event: &E, instance: &R) -> Result<bool, CheckFault> {
        let current = self.current_state(instance);
        match self.table.resolve(event, &current) {
            Some(transition) => {
                Ok(evaluate(transition.checks(), instance)? == CheckOutcome::Passed)
            }
            None => Ok(false),
        }
    }

    /// Events with a row for the instance's current state, in registration
    /// order.
    pub fn available_events(&self, instance: &R) -> Vec<E> {
        let current = self.current_state(instance);
        self.table
            .from_state(&current)
            .map(|t| t.event().clone())
            .collect()
    }

    /// Fire `event` against `instance`.
    ///
    /// On success the new state is saved and the committed
    /// [`StateTransition`] is returned. Rejections (`InvalidTransition`,
    /// `CheckFailed`, `ValidationFailed`) and check faults leave the
    /// instance in its pre-call state. A `CallbackFailed` error is returned
    /// after the commit and does not undo it. A machine without states or
    /// transitions refuses with `NotEnabled` before reading the instance.
    pub fn fire(&self, event: &E, instance: &mut R) -> Result<StateTransition<S>, StateableError> {
        if !self.is_enabled() {
            let model = std::any::type_name::<R>();
            debug!(model, event = event.name(), "state machine not enabled");
            return Err(NotEnabledError::new(MODULE_NAME, model)
                .called_from("fire")
                .into());
        }

        let from = self.current_state(instance);

        let Some(transition) = self.table.resolve(event, &from) else {
            debug!(
                event = event.name(),
                from = from.name(),
                "no transition for event from current state"
            );
            return Err(StateableError::InvalidTransition {
                event: event.name().to_string(),
                from: from.name().to_string(),
            });
        };

        match evaluate(transition.checks(), instance) {
            Ok(CheckOutcome::Passed) => {}
            Ok(CheckOutcome::Failed { description }) => {
                debug!(
                    event = event.name(),
                    from = from.name(),
                    check = %description,
                    "check rejected transition"
                );
                return Err(StateableError::CheckFailed {
                    event: event.name().to_string(),
                    description,
                });
            }
            Err(fault) => {
                warn!(event = event.name(), check = %fault.description, "check faulted");
                return Err(StateableError::CheckFault {
                    event: event.name().to_string(),
                    fault,
                });
            }
        }

        let to = transition.to().clone();
        instance.assign(&self.attribute, to.clone());

        if let Err(errors) = instance.save() {
            self.revert(instance, &from);
            warn!(
                event = event.name(),
                from = from.name(),
                to = to.name(),
                %errors,
                "save rejected, state reverted"
            );
            return Err(StateableError::ValidationFailed {
                event: event.name().to_string(),
                errors,
            });
        }

        let record = StateTransition {
            event: event.name().to_string(),
            from,
            to,
            timestamp: Utc::now(),
        };
        info!(
            event = record.event.as_str(),
            from = record.from.name(),
            to = record.to.name(),
            "transition committed"
        );

        for hook in self.commit_hooks() {
            hook(instance, &record);
        }

        for callback in transition.callbacks() {
            if let Err(source) = callback(instance, &record) {
                warn!(event = record.event.as_str(), error = %source, "callback failed after commit");
                return Err(StateableError::CallbackFailed {
                    event: record.event.clone(),
                    from: record.from.name().to_string(),
                    to: record.to.name().to_string(),
                    source,
                });
            }
        }

        Ok(record)
    }

    /// Undo the unsaved assignment made by `fire`.
    fn revert(&self, instance: &mut R, previous: &S) {
        instance.rollback(&self.attribute);

        if self.current_state(instance) != *previous {
            warn!(
                attribute = self.attribute.as_str(),
                state = previous.name(),
                "rollback left the attribute changed, assigning previous state"
            );
            instance.assign(&self.attribute, previous.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateMachineBuilder, TransitionBuilder};
    use crate::persistence::ValidationErrors;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum DocState {
            Draft,
            Published,
            Archived,
        }
        final: [Archived]
    }

    event_enum! {
        enum DocEvent {
            Publish,
            Archive,
            Touch,
        }
    }

    /// Collaborator that logs every call and can be told to refuse saves or
    /// to forget to roll back.
    #[derive(Default)]
    struct Doc {
        status: Option<DocState>,
        saved: Option<DocState>,
        views: u32,
        refuse_save: bool,
        broken_rollback: bool,
        calls: Vec<String>,
    }

    impl Persistence<DocState> for Doc {
        fn current_value(&self, _attribute: &str) -> Option<DocState> {
            self.status
        }

        fn assign(&mut self, attribute: &str, state: DocState) {
            self.calls.push(format!("assign {attribute} {}", state.name()));
            self.status = Some(state);
        }

        fn save(&mut self) -> Result<(), ValidationErrors> {
            self.calls.push("save".to_string());
            if self.refuse_save {
                return Err(ValidationErrors::single("title can't be blank"));
            }
            self.saved = self.status;
            Ok(())
        }

        fn rollback(&mut self, _attribute: &str) {
            self.calls.push("rollback".to_string());
            if !self.broken_rollback {
                self.status = self.saved;
            }
        }
    }

    fn machine() -> StateMachine<DocState, DocEvent, Doc> {
        StateMachineBuilder::new()
            .attribute("status")
            .states([DocState::Draft, DocState::Published, DocState::Archived])
            .initial(DocState::Draft)
            .transition(
                TransitionBuilder::new(DocEvent::Publish)
                    .from(DocState::Draft)
                    .to(DocState::Published)
                    .after(|doc: &mut Doc, t| doc.calls.push(format!("after {}", t.event))),
            )
            .transition(
                TransitionBuilder::new(DocEvent::Archive)
                    .from(DocState::Published)
                    .to(DocState::Archived)
                    .when("must have views", |doc: &Doc| doc.views > 0),
            )
            .on_commit(|doc, t| doc.calls.push(format!("commit {}", t.to.name())))
            .build()
            .unwrap()
    }

    #[test]
    fn unassigned_attribute_reads_as_initial_state() {
        let machine = machine();
        let doc = Doc::default();

        assert_eq!(machine.current_state(&doc), DocState::Draft);
        assert!(machine.can_fire(&DocEvent::Publish, &doc));
        assert!(!machine.can_fire(&DocEvent::Archive, &doc));
    }

    #[test]
    fn fire_follows_assign_save_commit_callback_order() {
        let machine = machine();
        let mut doc = Doc::default();

        let record = machine.fire(&DocEvent::Publish, &mut doc).unwrap();

        assert_eq!(record.from, DocState::Draft);
        assert_eq!(record.to, DocState::Published);
        assert_eq!(record.event, "Publish");
        assert_eq!(
            doc.calls,
            vec!["assign status Published", "save", "commit Published", "after Publish"]
        );
        assert_eq!(doc.saved, Some(DocState::Published));
    }

    #[test]
    fn unknown_and_wrong_state_events_are_reported_alike() {
        let machine = machine();
        let mut doc = Doc::default();

        let wrong_state = machine.fire(&DocEvent::Archive, &mut doc).unwrap_err();
        let no_rows = machine.fire(&DocEvent::Touch, &mut doc).unwrap_err();

        assert!(matches!(wrong_state, StateableError::InvalidTransition { .. }));
        assert!(matches!(no_rows, StateableError::InvalidTransition { .. }));
        assert!(doc.calls.is_empty());
    }

    #[test]
    fn rejected_check_mutates_nothing() {
        let machine = machine();
        let mut doc = Doc {
            status: Some(DocState::Published),
            saved: Some(DocState::Published),
            ..Doc::default()
        };

        let err = machine.fire(&DocEvent::Archive, &mut doc).unwrap_err();

        assert!(matches!(
            err,
            StateableError::CheckFailed { ref description, .. } if description == "must have views"
        ));
        assert!(doc.calls.is_empty());
        assert_eq!(doc.status, Some(DocState::Published));
    }

    #[test]
    fn refused_save_rolls_back_and_skips_callbacks() {
        let machine = machine();
        let mut doc = Doc {
            refuse_save: true,
            ..Doc::default()
        };

        let err = machine.fire(&DocEvent::Publish, &mut doc).unwrap_err();

        match err {
            StateableError::ValidationFailed { event, errors } => {
                assert_eq!(event, "Publish");
                assert!(errors.contains("title can't be blank"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
        assert_eq!(doc.calls, vec!["assign status Published", "save", "rollback"]);
        assert_eq!(machine.current_state(&doc), DocState::Draft);
    }

    #[test]
    fn previous_state_is_reassigned_when_rollback_does_not_restore_it() {
        let machine = machine();
        let mut doc = Doc {
            status: Some(DocState::Draft),
            saved: Some(DocState::Draft),
            refuse_save: true,
            broken_rollback: true,
            ..Doc::default()
        };

        let err = machine.fire(&DocEvent::Publish, &mut doc).unwrap_err();

        assert!(matches!(err, StateableError::ValidationFailed { .. }));
        assert_eq!(
            doc.calls,
            vec![
                "assign status Published",
                "save",
                "rollback",
                "assign status Draft"
            ]
        );
        assert_eq!(doc.status, Some(DocState::Draft));
    }

    #[test]
    fn permitted_evaluates_checks_without_side_effects() {
        let machine = machine();
        let mut doc = Doc {
            status: Some(DocState::Published),
            ..Doc::default()
        };

        assert!(machine.can_fire(&DocEvent::Archive, &doc));
        assert!(!machine.permitted(&DocEvent::Archive, &doc).unwrap());
        assert!(!machine.permitted(&DocEvent::Publish, &doc).unwrap());

        doc.views = 3;
        assert!(machine.permitted(&DocEvent::Archive, &doc).unwrap());
        assert!(doc.calls.is_empty());
    }

    #[test]
    fn machine_without_transitions_refuses_to_fire() {
        let machine = StateMachineBuilder::<DocState, DocEvent, Doc>::new()
            .state(DocState::Draft)
            .initial(DocState::Draft)
            .build()
            .unwrap();
        let mut doc = Doc::default();

        let err = machine.fire(&DocEvent::Publish, &mut doc).unwrap_err();

        match err {
            StateableError::NotEnabled(not_enabled) => {
                assert_eq!(not_enabled.method_called.as_deref(), Some("fire"));
                assert!(not_enabled.model_class.ends_with("Doc"));
            }
            other => panic!("expected NotEnabled, got {other:?}"),
        }
        assert!(doc.calls.is_empty());
    }

    #[test]
    fn available_events_follow_the_current_state() {
        let machine = machine();
        let mut doc = Doc::default();

        assert_eq!(machine.available_events(&doc), vec![DocEvent::Publish]);

        doc.status = Some(DocState::Published);
        assert_eq!(machine.available_events(&doc), vec![DocEvent::Archive]);

        doc.status = Some(DocState::Archived);
        assert!(machine.available_events(&doc).is_empty());
    }
}
