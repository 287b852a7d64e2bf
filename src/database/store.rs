use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use rusqlite::Connection;

use super::document::{Document, Fields, Query};
use super::queries;
use crate::error::StoreError;

pub type Snapshot = Vec<Document>;

/// Receives the complete result set on every change, or a terminal error.
pub type SnapshotListener = Box<dyn Fn(Result<Snapshot, StoreError>) + Send + Sync>;

/// The document-store collaborator every page talks to.
///
/// `subscribe` delivers an initial snapshot and then a fresh full snapshot
/// after every relevant write until the registration is removed. Writes are
/// acknowledged once durable; listeners may observe them on the same call.
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned id.
    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge `patch` into an existing document.
    fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), StoreError>;

    /// Merge `fields` into the document, creating it when absent.
    fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    fn subscribe(
        &self,
        query: Query,
        listener: SnapshotListener,
    ) -> Result<ListenerRegistration, StoreError>;
}

/// Handle to an open subscription. Removing it stops deliveries; merely
/// dropping it does not.
pub struct ListenerRegistration {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn remove(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// ─── SQLite-backed store ───

struct ListenerEntry {
    query: Query,
    listener: SnapshotListener,
}

#[derive(Default)]
struct ListenerRegistry {
    entries: Mutex<HashMap<u64, Arc<ListenerEntry>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    fn entries(&self) -> MutexGuard<'_, HashMap<u64, Arc<ListenerEntry>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, entry: ListenerEntry) -> (u64, Arc<ListenerEntry>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(entry);
        self.entries().insert(id, Arc::clone(&entry));
        (id, entry)
    }

    fn remove(&self, id: u64) -> bool {
        self.entries().remove(&id).is_some()
    }

    fn matching(&self, collection: Option<&str>) -> Vec<(u64, Arc<ListenerEntry>)> {
        self.entries()
            .iter()
            .filter(|(_, entry)| collection.map_or(true, |c| entry.query.collection == c))
            .map(|(id, entry)| (*id, Arc::clone(entry)))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}

/// Local document store on top of a single rusqlite connection.
///
/// Listeners are invoked on the writing thread after the connection lock is
/// released, so a listener may call back into the store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    registry: Arc<ListenerRegistry>,
    data_version: AtomicI64,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = super::init_database(db_path)
            .map_err(|e| StoreError::Open(format!("{}: {:#}", db_path.display(), e)))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        super::configure_connection(&conn)
            .map_err(|e| StoreError::Open(format!("in-memory schema: {:#}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let version = queries::data_version(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            registry: Arc::new(ListenerRegistry::default()),
            data_version: AtomicI64::new(version),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    pub fn count(&self, collection: &str) -> Result<i64, StoreError> {
        queries::count_documents(&self.conn(), collection)
    }

    /// Re-deliver every open query if another process committed since the
    /// last check. Returns whether anything was re-delivered.
    pub fn poll_external_changes(&self) -> Result<bool, StoreError> {
        let current = queries::data_version(&self.conn())?;
        let previous = self.data_version.swap(current, Ordering::Relaxed);
        if current == previous {
            return Ok(false);
        }
        log::debug!("External write detected (data_version {} -> {})", previous, current);
        self.notify(None);
        Ok(true)
    }

    fn run_query(&self, query: &Query) -> Result<Snapshot, StoreError> {
        queries::query_documents(&self.conn(), query)
    }

    fn notify(&self, collection: Option<&str>) {
        for (id, entry) in self.registry.matching(collection) {
            match self.run_query(&entry.query) {
                Ok(snapshot) => (entry.listener)(Ok(snapshot)),
                Err(err) => {
                    log::warn!("Query on '{}' failed, closing listener: {}", entry.query.collection, err);
                    self.registry.remove(id);
                    (entry.listener)(Err(err));
                }
            }
        }
    }
}

impl DocumentStore for SqliteStore {
    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        queries::insert_document(&self.conn(), collection, &id, &fields, now)?;
        log::debug!("Added {}/{}", collection, id);
        self.notify(Some(collection));
        Ok(id)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        queries::get_document(&self.conn(), collection, id)
    }

    fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), StoreError> {
        {
            let conn = self.conn();
            let mut doc = queries::get_document(&conn, collection, id)?.ok_or_else(|| {
                StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
            })?;
            doc.data.extend(patch);
            let now = chrono::Utc::now().timestamp();
            queries::replace_document(&conn, collection, id, &doc.data, now)?;
        }
        log::debug!("Updated {}/{}", collection, id);
        self.notify(Some(collection));
        Ok(())
    }

    fn set_merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        {
            let conn = self.conn();
            let now = chrono::Utc::now().timestamp();
            match queries::get_document(&conn, collection, id)? {
                Some(mut doc) => {
                    doc.data.extend(fields);
                    queries::replace_document(&conn, collection, id, &doc.data, now)?;
                }
                None => queries::insert_document(&conn, collection, id, &fields, now)?,
            }
        }
        log::debug!("Merged {}/{}", collection, id);
        self.notify(Some(collection));
        Ok(())
    }

    fn subscribe(
        &self,
        query: Query,
        listener: SnapshotListener,
    ) -> Result<ListenerRegistration, StoreError> {
        let collection = query.collection.clone();
        let (id, entry) = self.registry.insert(ListenerEntry { query, listener });

        let initial = match self.run_query(&entry.query) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.registry.remove(id);
                return Err(err);
            }
        };

        let registry: Weak<ListenerRegistry> = Arc::downgrade(&self.registry);
        let registration = ListenerRegistration::new(move || {
            if let Some(registry) = registry.upgrade() {
                if registry.remove(id) {
                    log::debug!("Listener {} on '{}' removed", id, collection);
                }
            }
        });

        (entry.listener)(Ok(initial));
        Ok(registration)
    }
}
