//! End-to-end behavior of firing events against stored records.

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use stateable::builder::{StateMachineBuilder, TransitionBuilder};
use stateable::core::Check;
use stateable::persistence::{MemoryStore, Persistence, Record};
use stateable::validation::ValidationBuilder;
use stateable::{event_enum, state_enum, StateMachine, Stateable, StateableError};
use std::sync::{Arc, Mutex};
use std::thread;

state_enum! {
    pub enum ArticleState {
        Draft,
        Published,
        Archived,
    }
    final: [Archived]
}

event_enum! {
    pub enum ArticleEvent {
        Publish,
        Archive,
        Refresh,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Article {
    title: String,
    view_count: u32,
    notified: u32,
}

type ArticleRecord = Record<Article, ArticleState, ArticleEvent>;
type ArticleStore = MemoryStore<Article, ArticleState, ArticleEvent>;

fn article(title: &str, view_count: u32) -> Article {
    Article {
        title: title.to_string(),
        view_count,
        notified: 0,
    }
}

fn builder() -> StateMachineBuilder<ArticleState, ArticleEvent, ArticleRecord> {
    StateMachineBuilder::new()
        .states([
            ArticleState::Draft,
            ArticleState::Published,
            ArticleState::Archived,
        ])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Publish)
                .from(ArticleState::Draft)
                .to(ArticleState::Published),
        )
        .transition(
            TransitionBuilder::new(ArticleEvent::Archive)
                .from(ArticleState::Published)
                .to(ArticleState::Archived)
                .when("must have view_count > 0", |a: &ArticleRecord| {
                    a.view_count > 0
                }),
        )
}

fn store() -> ArticleStore {
    MemoryStore::new("Article").with_machine(builder().build().unwrap())
}

fn published(store: &ArticleStore, view_count: u32) -> ArticleRecord {
    let mut record = store.create(article("Hello", view_count));
    record.fire(ArticleEvent::Publish).unwrap();
    record
}

#[test]
fn fresh_instance_publishes() {
    let store = store();
    let mut record = store.create(article("Hello", 0));
    assert_eq!(record.current_state().unwrap(), ArticleState::Draft);

    let transition = record.fire(ArticleEvent::Publish).unwrap();

    assert_eq!(transition.from, ArticleState::Draft);
    assert_eq!(transition.to, ArticleState::Published);
    assert_eq!(record.current_state().unwrap(), ArticleState::Published);
    assert_eq!(
        store.stored_state(record.id()).unwrap(),
        Some(ArticleState::Published)
    );
}

#[test]
fn publishing_twice_is_an_invalid_transition() {
    let store = store();
    let mut record = published(&store, 0);

    let err = record.fire(ArticleEvent::Publish).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cannot fire event 'Publish' from state 'Published'"
    );
    assert!(err.is_rejection());
    assert_eq!(record.current_state().unwrap(), ArticleState::Published);
}

#[test]
fn event_without_rows_is_an_invalid_transition() {
    let store = store();
    let mut record = store.create(article("Hello", 0));

    let err = record.fire(ArticleEvent::Refresh).unwrap_err();

    assert!(matches!(
        err,
        StateableError::InvalidTransition { ref event, ref from }
            if event == "Refresh" && from == "Draft"
    ));
}

#[test]
fn failing_check_keeps_state_and_storage() {
    let store = store();
    let mut record = published(&store, 0);
    let version = record.version();

    let err = record.fire(ArticleEvent::Archive).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Event 'Archive' rejected: must have view_count > 0"
    );
    assert_eq!(record.current_state().unwrap(), ArticleState::Published);
    assert!(!record.state_changed());
    assert_eq!(record.version(), version);
}

#[test]
fn refused_save_reverts_the_assignment() {
    let store = ArticleStore::new("Article")
        .with_machine(builder().build().unwrap())
        .with_validations(
            ValidationBuilder::new()
                .presence("title", |a: &Article| a.title.as_str())
                .build(),
        );
    let mut record = store.create(article("", 0));

    let err = record.fire(ArticleEvent::Publish).unwrap_err();

    match err {
        StateableError::ValidationFailed { event, errors } => {
            assert_eq!(event, "Publish");
            assert_eq!(errors.messages(), &["title can't be blank".to_string()][..]);
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(record.current_state().unwrap(), ArticleState::Draft);
    assert!(!record.state_changed());
    assert!(store.is_empty());
}

#[test]
fn type_without_machine_is_not_enabled() {
    let store = ArticleStore::new("Article");
    let mut record = store.create(article("Hello", 0));

    for event in [ArticleEvent::Publish, ArticleEvent::Archive] {
        let err = record.fire(event).unwrap_err();
        assert!(matches!(
            err,
            StateableError::NotEnabled(ref e) if e.model_class == "Article"
        ));
        assert_eq!(
            err.to_string(),
            "Stateable is not enabled. Add 'stateable' to your model. Called from `fire`."
        );
    }
    assert!(!record.can_fire(&ArticleEvent::Publish));
    assert!(record.current_state().is_err());
    assert!(record.available_events().is_err());
}

#[test]
fn machine_without_transitions_is_not_enabled() {
    let machine = StateMachineBuilder::<ArticleState, ArticleEvent, ArticleRecord>::new()
        .state(ArticleState::Draft)
        .initial(ArticleState::Draft)
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    assert!(matches!(
        record.fire(ArticleEvent::Publish),
        Err(StateableError::NotEnabled(_))
    ));
}

#[test]
fn rejected_check_runs_no_callbacks() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let machine = StateMachineBuilder::new()
        .states([ArticleState::Draft, ArticleState::Published])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Publish)
                .from(ArticleState::Draft)
                .to(ArticleState::Published)
                .when("never", |_: &ArticleRecord| false)
                .after(move |_, t| seen.lock().unwrap().push(t.event.clone())),
        )
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 3));

    assert!(record.fire(ArticleEvent::Publish).is_err());

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(record.data(), &article("Hello", 3));
    assert!(!record.state_changed());
}

#[test]
fn checks_stop_at_first_failure() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let step = |name: &'static str, result: bool| {
        let order = Arc::clone(&order);
        Check::new(name, move |_: &ArticleRecord| {
            order.lock().unwrap().push(name);
            result
        })
    };
    let machine = StateMachineBuilder::new()
        .states([ArticleState::Draft, ArticleState::Published])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Publish)
                .from(ArticleState::Draft)
                .to(ArticleState::Published)
                .check(step("first", true))
                .check(step("second", false))
                .check(step("third", true)),
        )
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    let err = record.fire(ArticleEvent::Publish).unwrap_err();

    assert!(matches!(
        err,
        StateableError::CheckFailed { ref description, .. } if description == "second"
    ));
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn faulting_check_surfaces_its_source() {
    let machine = StateMachineBuilder::new()
        .states([ArticleState::Draft, ArticleState::Published])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Publish)
                .from(ArticleState::Draft)
                .to(ArticleState::Published)
                .check(Check::fallible("quota lookup", |_: &ArticleRecord| {
                    Err("quota service unavailable".into())
                })),
        )
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    let err = record.fire(ArticleEvent::Publish).unwrap_err();

    assert!(matches!(err, StateableError::CheckFault { .. }));
    assert!(!err.is_rejection());
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert!(source.is_some());
    assert_eq!(record.current_state().unwrap(), ArticleState::Draft);
}

#[test]
fn callback_failure_keeps_the_commit() {
    let machine = StateMachineBuilder::new()
        .states([ArticleState::Draft, ArticleState::Published])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Publish)
                .from(ArticleState::Draft)
                .to(ArticleState::Published)
                .after(|a: &mut ArticleRecord, _| a.data_mut().notified += 1)
                .callback(|_, _| Err("mailer down".into()))
                .after(|a: &mut ArticleRecord, _| a.data_mut().notified += 10),
        )
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    let err = record.fire(ArticleEvent::Publish).unwrap_err();

    assert!(matches!(
        err,
        StateableError::CallbackFailed { ref from, ref to, .. } if from == "Draft" && to == "Published"
    ));
    assert_eq!(record.notified, 1);
    assert_eq!(record.current_state().unwrap(), ArticleState::Published);
    assert_eq!(
        store.stored_state(record.id()).unwrap(),
        Some(ArticleState::Published)
    );
}

#[test]
fn stale_concurrent_save_is_rolled_back() {
    let store = store();
    let mut original = store.create(article("Hello", 5));
    original.save().unwrap();

    let mut first = store.load(original.id()).unwrap();
    let mut second = store.load(original.id()).unwrap();

    first.fire(ArticleEvent::Publish).unwrap();
    let err = second.fire(ArticleEvent::Publish).unwrap_err();

    assert!(matches!(err, StateableError::ValidationFailed { .. }));
    assert_eq!(second.current_state().unwrap(), ArticleState::Draft);

    second.reload().unwrap();
    assert_eq!(second.current_state().unwrap(), ArticleState::Published);
    second.fire(ArticleEvent::Archive).unwrap();
    assert_eq!(
        store.stored_state(original.id()).unwrap(),
        Some(ArticleState::Archived)
    );
}

#[test]
fn commit_hook_records_history() {
    let machine = builder()
        .on_commit(|record: &mut ArticleRecord, t| record.record_transition(t))
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 2));

    record.fire(ArticleEvent::Publish).unwrap();
    let _ = record.fire(ArticleEvent::Publish);
    record.fire(ArticleEvent::Archive).unwrap();

    let history = record.history();
    assert_eq!(history.events(), vec!["Publish", "Archive"]);
    assert_eq!(
        history.get_path(),
        vec![
            &ArticleState::Draft,
            &ArticleState::Published,
            &ArticleState::Archived
        ]
    );
    assert!(history.duration().is_some());
}

#[test]
fn available_and_permitted_events_track_state() {
    let store = store();
    let mut record = store.create(article("Hello", 0));

    assert_eq!(
        record.available_events().unwrap(),
        vec![ArticleEvent::Publish]
    );
    record.fire(ArticleEvent::Publish).unwrap();
    assert_eq!(
        record.available_events().unwrap(),
        vec![ArticleEvent::Archive]
    );

    assert!(record.can_fire(&ArticleEvent::Archive));
    assert!(!record.permitted(&ArticleEvent::Archive).unwrap());

    record.data_mut().view_count = 1;
    assert!(record.permitted(&ArticleEvent::Archive).unwrap());
}

#[test]
fn self_loop_is_committed_like_any_transition() {
    let machine = builder()
        .transition(
            TransitionBuilder::new(ArticleEvent::Refresh)
                .from(ArticleState::Published)
                .to(ArticleState::Published),
        )
        .build()
        .unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = published(&store, 0);
    let version = record.version();

    let transition = record.fire(ArticleEvent::Refresh).unwrap();

    assert!(transition.is_self_loop());
    assert_eq!(record.version(), version + 1);
}

#[test]
fn custom_attribute_name_is_used_for_storage() {
    let machine = builder().attribute("status").build().unwrap();
    let store = ArticleStore::new("Article").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    record.fire(ArticleEvent::Publish).unwrap();

    assert_eq!(store.attribute(), "status");
    assert_eq!(
        record.current_value("status"),
        Some(ArticleState::Published)
    );
    assert_eq!(record.current_value("state"), None);
}

#[test]
fn string_states_and_events_work_without_enums() {
    let machine = StateMachineBuilder::<String, String, Record<Article, String, String>>::new()
        .states(["open".to_string(), "closed".to_string()])
        .initial("open".to_string())
        .transition(
            TransitionBuilder::new("close".to_string())
                .from("open".to_string())
                .to("closed".to_string()),
        )
        .build()
        .unwrap();
    let store = MemoryStore::new("Ticket").with_machine(machine);
    let mut record = store.create(article("Hello", 0));

    record.fire("close".to_string()).unwrap();
    let err = record.fire("reopen".to_string()).unwrap_err();

    assert_eq!(record.current_state().unwrap(), "closed");
    assert_eq!(
        err.to_string(),
        "Cannot fire event 'reopen' from state 'closed'"
    );
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn machine_and_store_can_be_shared_across_threads() {
    assert_send_sync::<StateMachine<ArticleState, ArticleEvent, ArticleRecord>>();
    assert_send_sync::<ArticleStore>();
}

#[test]
fn records_fire_concurrently_through_one_store() {
    let store = store();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || {
                let mut record = store.create(article(&format!("Article {i}"), 1));
                record.fire(ArticleEvent::Publish).unwrap();
                record.fire(ArticleEvent::Archive).unwrap();
                record.id()
            })
        })
        .collect();

    let ids: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(store.len(), 8);
    for id in ids {
        assert_eq!(store.stored_state(id).unwrap(), Some(ArticleState::Archived));
    }
}
