mod common;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

use common::{store, Recorder};
use motiverse::database::{DocumentStore, Fields, Query, SqliteStore};
use motiverse::services::live_binding::newest_first;
use motiverse::services::{BindingEvent, BindingState, ChannelConsumer, LiveCollectionBinding};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Note {
    id: String,
    text: String,
    created_at: i64,
}

fn note(text: &str, created_at: i64) -> Fields {
    json!({ "text": text, "createdAt": created_at, "owner": "alice" })
        .as_object()
        .cloned()
        .unwrap()
}

fn bind_notes(store: &SqliteStore, recorder: &Arc<Recorder<Note>>) -> LiveCollectionBinding<Note> {
    LiveCollectionBinding::bind(
        store,
        Query::collection("notes").where_eq("owner", "alice"),
        newest_first(|n: &Note| n.created_at),
        recorder.clone(),
    )
}

#[test]
fn writes_reach_only_listeners_of_that_collection() {
    let store = store();
    let notes = Recorder::<Note>::new();
    let _binding = bind_notes(&store, &notes);
    assert_eq!(notes.snapshot_count(), 1);

    store.add("other", note("elsewhere", 1)).unwrap();
    assert_eq!(notes.snapshot_count(), 1);

    store.add("notes", note("first", 1)).unwrap();
    store.add("notes", note("second", 2)).unwrap();
    assert_eq!(notes.snapshot_count(), 3);

    let texts: Vec<String> = notes.last().into_iter().map(|n| n.text).collect();
    assert_eq!(texts, vec!["second", "first"]);
}

#[test]
fn no_delivery_after_release() {
    let store = store();
    let notes = Recorder::<Note>::new();
    let binding = bind_notes(&store, &notes);
    assert_eq!(store.listener_count(), 1);

    binding.release();
    binding.release();
    assert_eq!(binding.state(), BindingState::Released);
    assert_eq!(store.listener_count(), 0);

    store.add("notes", note("late", 5)).unwrap();
    assert_eq!(notes.snapshot_count(), 1);
}

#[test]
fn dropping_a_binding_releases_it() {
    let store = store();
    let notes = Recorder::<Note>::new();
    {
        let _binding = bind_notes(&store, &notes);
        assert_eq!(store.listener_count(), 1);
    }
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn malformed_documents_are_skipped() {
    let store = store();
    store.add("notes", note("good", 1)).unwrap();
    let bad = json!({ "text": 42, "owner": "alice" });
    store.add("notes", bad.as_object().cloned().unwrap()).unwrap();

    let notes = Recorder::<Note>::new();
    let binding = bind_notes(&store, &notes);

    assert_eq!(notes.last().len(), 1);
    assert_eq!(binding.state(), BindingState::Active { len: 1 });
    assert!(notes.errors().is_empty());
}

#[test]
fn independent_bindings_release_separately() {
    let store = store();
    let first = Recorder::<Note>::new();
    let second = Recorder::<Note>::new();
    let a = bind_notes(&store, &first);
    let b = bind_notes(&store, &second);

    a.release();
    store.add("notes", note("only b", 1)).unwrap();

    assert_eq!(first.snapshot_count(), 1);
    assert_eq!(second.snapshot_count(), 2);
    assert_eq!(b.state(), BindingState::Active { len: 1 });
}

#[test]
fn external_commits_are_picked_up_by_polling() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motiverse.db");
    let writer = SqliteStore::open(&path).unwrap();
    let reader = SqliteStore::open(&path).unwrap();

    let notes = Recorder::<Note>::new();
    let _binding = bind_notes(&reader, &notes);
    assert!(!reader.poll_external_changes().unwrap());

    writer.add("notes", note("from another process", 3)).unwrap();
    assert_eq!(notes.snapshot_count(), 1);

    assert!(reader.poll_external_changes().unwrap());
    assert_eq!(notes.last().len(), 1);
    assert!(!reader.poll_external_changes().unwrap());
}

#[tokio::test]
async fn channel_consumer_forwards_snapshots() {
    let store = store();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let binding: LiveCollectionBinding<Note> = LiveCollectionBinding::bind(
        store.as_ref(),
        Query::collection("notes"),
        newest_first(|n: &Note| n.created_at),
        Arc::new(ChannelConsumer::new(tx)),
    );

    store.add("notes", note("hello", 1)).unwrap();

    match rx.recv().await {
        Some(BindingEvent::Snapshot(items)) => assert!(items.is_empty()),
        other => panic!("expected initial snapshot, got {:?}", other),
    }
    match rx.recv().await {
        Some(BindingEvent::Snapshot(items)) => assert_eq!(items[0].text, "hello"),
        other => panic!("expected second snapshot, got {:?}", other),
    }

    binding.release();
    store.add("notes", note("ignored", 2)).unwrap();
    assert!(rx.try_recv().is_err());
}
