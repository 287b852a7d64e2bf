mod common;

use std::sync::Arc;

use common::{alice, FailingStore, Recorder};
use motiverse::database::DocumentStore;
use motiverse::models::{CalendarEvent, EventCategory, Goal};
use motiverse::services::{
    BindingState, CalendarPage, EventDraft, GoalDraft, GoalsPage, InboxPage, MessageDraft, NewsDraft,
    NewsPage,
};
use motiverse::AppError;

fn failing() -> Arc<dyn DocumentStore> {
    Arc::new(FailingStore)
}

#[test]
fn failed_writes_keep_the_draft() {
    let goals = GoalsPage::new(alice(), failing(), chrono_tz::UTC);
    let mut goal = GoalDraft::new("meditate");
    let err = goals.add_goal(&mut goal).unwrap_err();
    assert!(matches!(err, AppError::Write(_)));
    assert_eq!(err.banner("goal"), "Failed to save goal.");
    assert_eq!(goal.text, "meditate");

    let calendar = CalendarPage::new(alice(), failing());
    let mut event = EventDraft {
        title: "Focus".to_string(),
        category: EventCategory::FocusBlock,
        date: "2024-06-15".to_string(),
    };
    assert!(matches!(calendar.add_event(&mut event), Err(AppError::Write(_))));
    assert_eq!(event.category, EventCategory::FocusBlock);
    assert_eq!(event.date, "2024-06-15");

    let inbox = InboxPage::new(&alice(), failing()).unwrap();
    let mut message = MessageDraft {
        to: "bob@example.com".to_string(),
        title: "hi".to_string(),
        body: "hello".to_string(),
    };
    assert!(inbox.send_message(&mut message).is_err());
    assert_eq!(message.body, "hello");

    let news = NewsPage::new(alice(), failing());
    let mut post = NewsDraft {
        title: "Update".to_string(),
        summary: "details".to_string(),
    };
    assert!(news.post(&mut post).is_err());
    assert_eq!(post.title, "Update");
}

#[test]
fn failed_toggle_is_reported() {
    let goals = GoalsPage::new(alice(), failing(), chrono_tz::UTC);
    let mut goal = Goal::new("alice", "walk", 0);
    goal.id = "g1".to_string();
    assert!(matches!(goals.toggle_complete(&goal), Err(AppError::Write(_))));
}

#[test]
fn subscribe_failure_reaches_consumer_once() {
    let calendar = CalendarPage::new(alice(), failing());
    let recorder = Recorder::<CalendarEvent>::new();
    let binding = calendar.bind(recorder.clone());

    assert_eq!(recorder.errors().len(), 1);
    assert_eq!(recorder.snapshot_count(), 0);
    assert!(matches!(binding.state(), BindingState::Error(_)));

    binding.release();
    binding.release();
    assert_eq!(recorder.errors().len(), 1);
}
