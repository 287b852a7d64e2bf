#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use motiverse::database::{
    Document, DocumentStore, Fields, ListenerRegistration, Query, SnapshotListener, SqliteStore,
};
use motiverse::services::{BindingConsumer, Session};
use motiverse::StoreError;

pub fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::in_memory().expect("open in-memory store"))
}

pub fn dyn_store(store: &Arc<SqliteStore>) -> Arc<dyn DocumentStore> {
    Arc::clone(store) as Arc<dyn DocumentStore>
}

pub fn alice() -> Session {
    Session::new("alice")
        .with_email("alice@example.com")
        .with_display_name("Alice")
}

pub fn bob() -> Session {
    Session::new("bob").with_email("bob@example.com")
}

/// Collects every delivery for later inspection.
pub struct Recorder<T> {
    pub snapshots: Mutex<Vec<Vec<T>>>,
    pub errors: Mutex<Vec<String>>,
}

impl<T> Recorder<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            snapshots: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        })
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl<T: Clone> Recorder<T> {
    pub fn last(&self) -> Vec<T> {
        self.snapshots
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one snapshot")
    }
}

impl<T: Clone + Send + Sync> BindingConsumer<T> for Recorder<T> {
    fn on_snapshot(&self, items: &[T]) {
        self.snapshots.lock().unwrap().push(items.to_vec());
    }

    fn on_error(&self, error: &StoreError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

/// A store whose every operation fails.
pub struct FailingStore;

impl DocumentStore for FailingStore {
    fn add(&self, _collection: &str, _fields: Fields) -> Result<String, StoreError> {
        Err(StoreError::Closed)
    }

    fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Closed)
    }

    fn update(&self, _collection: &str, _id: &str, _patch: Fields) -> Result<(), StoreError> {
        Err(StoreError::Closed)
    }

    fn set_merge(&self, _collection: &str, _id: &str, _fields: Fields) -> Result<(), StoreError> {
        Err(StoreError::Closed)
    }

    fn subscribe(
        &self,
        _query: Query,
        _listener: SnapshotListener,
    ) -> Result<ListenerRegistration, StoreError> {
        Err(StoreError::InvalidQuery("permission denied".to_string()))
    }
}
