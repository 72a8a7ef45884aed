//! Article Publishing Workflow
//!
//! This example walks one article through a publish/review/archive
//! workflow backed by the in-memory store.
//!
//! Key concepts:
//! - States and events declared as enums
//! - Checks reject transitions before anything is mutated
//! - A refused save reverts the state attribute
//! - Callbacks run only after the new state is saved
//! - Commit hooks keep an audit trail
//!
//! Run with: cargo run --example article_workflow

use serde::{Deserialize, Serialize};
use stateable::builder::{StateMachineBuilder, TransitionBuilder};
use stateable::persistence::{MemoryStore, Record};
use stateable::validation::ValidationBuilder;
use stateable::{event_enum, state_enum, Stateable, StateableError};

state_enum! {
    enum ArticleState {
        Draft,
        Review,
        Published,
        Archived,
    }
    final: [Archived]
}

event_enum! {
    enum ArticleEvent {
        Submit,
        Approve,
        Reject,
        Archive,
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Article {
    title: String,
    body: String,
    view_count: u32,
    subscribers_notified: bool,
}

type ArticleRecord = Record<Article, ArticleState, ArticleEvent>;

// Pure checks
fn has_enough_words(article: &ArticleRecord) -> bool {
    article.body.split_whitespace().count() >= 5
}

fn has_readers(article: &ArticleRecord) -> bool {
    article.view_count > 0
}

fn report(label: &str, result: Result<(), StateableError>) {
    match result {
        Ok(()) => println!("  ✓ {label}"),
        Err(err) => println!("  ✗ {label}: {err}"),
    }
}

fn main() {
    println!("=== Article Publishing Workflow ===\n");

    let machine = StateMachineBuilder::new()
        .attribute("status")
        .states([
            ArticleState::Draft,
            ArticleState::Review,
            ArticleState::Published,
            ArticleState::Archived,
        ])
        .initial(ArticleState::Draft)
        .transition(
            TransitionBuilder::new(ArticleEvent::Submit)
                .from(ArticleState::Draft)
                .to(ArticleState::Review)
                .when("body must have at least 5 words", has_enough_words),
        )
        .transition(
            TransitionBuilder::new(ArticleEvent::Approve)
                .from(ArticleState::Review)
                .to(ArticleState::Published)
                .after(|article: &mut ArticleRecord, _| {
                    article.data_mut().subscribers_notified = true;
                }),
        )
        .transition(
            TransitionBuilder::new(ArticleEvent::Reject)
                .from(ArticleState::Review)
                .to(ArticleState::Draft),
        )
        .transition(
            TransitionBuilder::new(ArticleEvent::Archive)
                .from_each([ArticleState::Draft, ArticleState::Published])
                .to(ArticleState::Archived)
                .when("must have view_count > 0", has_readers),
        )
        .on_commit(|article: &mut ArticleRecord, transition| {
            article.record_transition(transition);
        })
        .build()
        .unwrap();

    let store = MemoryStore::new("Article")
        .with_machine(machine)
        .with_validations(
            ValidationBuilder::new()
                .presence("title", |a: &Article| a.title.as_str())
                .build(),
        );

    let mut article = store.create(Article {
        title: String::new(),
        body: "Too short".to_string(),
        view_count: 0,
        subscribers_notified: false,
    });

    println!("Step 1: Submit a two-word draft");
    report("submit", article.fire(ArticleEvent::Submit).map(drop));

    println!("\nStep 2: Expand the body, submit without a title");
    article.data_mut().body = "State machines keep workflows honest and explicit".to_string();
    report("submit", article.fire(ArticleEvent::Submit).map(drop));
    println!("  State is still {:?}", article.current_state().unwrap());

    println!("\nStep 3: Add a title and submit again");
    article.data_mut().title = "Explicit workflows".to_string();
    report("submit", article.fire(ArticleEvent::Submit).map(drop));

    println!("\nStep 4: Approve");
    println!("  Available: {:?}", article.available_events().unwrap());
    report("approve", article.fire(ArticleEvent::Approve).map(drop));
    println!("  Subscribers notified: {}", article.subscribers_notified);

    println!("\nStep 5: Archive an unread article");
    report("archive", article.fire(ArticleEvent::Archive).map(drop));

    article.data_mut().view_count = 42;
    report("archive after readers", article.fire(ArticleEvent::Archive).map(drop));

    println!("\nAudit trail:");
    for transition in article.history().transitions() {
        println!(
            "  {} : {:?} -> {:?}",
            transition.event, transition.from, transition.to
        );
    }
    println!(
        "Stored state: {:?}",
        store.stored_state(article.id()).unwrap()
    );

    println!("\nKey Takeaways:");
    println!("- Checks reject transitions before any mutation");
    println!("- Validation failures leave the previous state in place");
    println!("- Callbacks and hooks run only after a successful save");
    println!("- Archived is terminal: no events are available from it");

    println!("\n=== Example Complete ===");
}
