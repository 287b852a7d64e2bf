//! Live query binding shared by every feature page.
//!
//! A binding opens one store subscription, decodes and sorts each full
//! snapshot, and hands the result to a consumer until it is released.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedSender;

use crate::database::{DocumentStore, ListenerRegistration, Query, Snapshot};
use crate::error::StoreError;

pub trait BindingConsumer<T>: Send + Sync {
    fn on_snapshot(&self, items: &[T]);
    fn on_error(&self, error: &StoreError);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Subscribing,
    Active { len: usize },
    Error(String),
    Released,
}

impl BindingState {
    fn is_terminal(&self) -> bool {
        matches!(self, BindingState::Error(_) | BindingState::Released)
    }
}

struct Shared {
    state: BindingState,
    registration: Option<ListenerRegistration>,
    /// Thread currently inside a consumer callback, if any.
    delivering: Option<ThreadId>,
}

/// State plus a gate held for the whole of each consumer callback, so
/// `release` can wait out a delivery running on another thread.
struct Inner {
    shared: Mutex<Shared>,
    gate: Mutex<()>,
}

pub struct LiveCollectionBinding<T> {
    label: String,
    inner: Arc<Inner>,
    _items: PhantomData<fn() -> T>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

impl Inner {
    /// Take the delivery gate unless this thread already holds it (a consumer
    /// whose callback writes to the store gets nested deliveries).
    fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        let current = thread::current().id();
        if lock(&self.shared).delivering == Some(current) {
            return None;
        }
        Some(self.gate.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl<T> LiveCollectionBinding<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Subscribe to `query`, sorting every snapshot with `compare`.
    ///
    /// Failures, including failure to open the subscription, reach
    /// `consumer.on_error` exactly once and leave the binding closed.
    pub fn bind<F>(
        store: &dyn DocumentStore,
        query: Query,
        compare: F,
        consumer: Arc<dyn BindingConsumer<T>>,
    ) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let label = match &query.filter {
            crate::database::Filter::All => query.collection.clone(),
            crate::database::Filter::FieldEquals { field, value } => {
                format!("{}[{}={}]", query.collection, field, value)
            }
        };
        let inner = Arc::new(Inner {
            shared: Mutex::new(Shared {
                state: BindingState::Subscribing,
                registration: None,
                delivering: None,
            }),
            gate: Mutex::new(()),
        });

        let listener_inner = Arc::clone(&inner);
        let listener_consumer = Arc::clone(&consumer);
        let listener_label = label.clone();
        let listener = Box::new(move |event: Result<Snapshot, StoreError>| match event {
            Ok(snapshot) => {
                let mut items: Vec<T> = snapshot
                    .iter()
                    .filter_map(|doc| match doc.decode::<T>() {
                        Ok(item) => Some(item),
                        Err(e) => {
                            log::warn!("Skipping malformed document {} in {}: {}", doc.id, listener_label, e);
                            None
                        }
                    })
                    .collect();
                items.sort_by(|a, b| compare(a, b));

                let _gate = listener_inner.enter();
                let previous = {
                    let mut guard = lock(&listener_inner.shared);
                    if guard.state.is_terminal() {
                        return;
                    }
                    guard.state = BindingState::Active { len: items.len() };
                    guard.delivering.replace(thread::current().id())
                };
                listener_consumer.on_snapshot(&items);
                lock(&listener_inner.shared).delivering = previous;
            }
            Err(err) => {
                let _gate = listener_inner.enter();
                let (registration, previous) = {
                    let mut guard = lock(&listener_inner.shared);
                    if guard.state.is_terminal() {
                        return;
                    }
                    guard.state = BindingState::Error(err.to_string());
                    let previous = guard.delivering.replace(thread::current().id());
                    (guard.registration.take(), previous)
                };
                log::warn!("Live query {} failed: {}", listener_label, err);
                if let Some(registration) = registration {
                    registration.remove();
                }
                listener_consumer.on_error(&err);
                lock(&listener_inner.shared).delivering = previous;
            }
        });

        match store.subscribe(query, listener) {
            Ok(registration) => {
                let mut guard = lock(&inner.shared);
                if guard.state.is_terminal() {
                    // Failed or released while the initial snapshot was delivered.
                    drop(guard);
                    registration.remove();
                } else {
                    guard.registration = Some(registration);
                    log::debug!("Bound live query {}", label);
                }
            }
            Err(err) => {
                {
                    let mut guard = lock(&inner.shared);
                    guard.state = BindingState::Error(err.to_string());
                }
                log::warn!("Could not subscribe to {}: {}", label, err);
                consumer.on_error(&err);
            }
        }

        Self {
            label,
            inner,
            _items: PhantomData,
        }
    }
}

impl<T> LiveCollectionBinding<T> {
    pub fn state(&self) -> BindingState {
        lock(&self.inner.shared).state.clone()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cancel the subscription. Only the first call has any effect.
    ///
    /// When this returns, no callback is running on another thread and none
    /// will start. Called from inside the consumer's own callback, that
    /// callback finishes but nothing follows it.
    pub fn release(&self) {
        let registration = {
            let mut guard = lock(&self.inner.shared);
            if guard.state == BindingState::Released {
                return;
            }
            guard.state = BindingState::Released;
            guard.registration.take()
        };
        if let Some(registration) = registration {
            registration.remove();
            log::debug!("Released live query {}", self.label);
        }
        drop(self.inner.enter());
    }
}

impl<T> Drop for LiveCollectionBinding<T> {
    fn drop(&mut self) {
        self.release();
    }
}

// ─── Consumers ───

#[derive(Debug, Clone, PartialEq)]
pub enum BindingEvent<T> {
    Snapshot(Vec<T>),
    Error(String),
}

/// Forwards binding events into a tokio channel for async consumers.
pub struct ChannelConsumer<T> {
    tx: UnboundedSender<BindingEvent<T>>,
}

impl<T> ChannelConsumer<T> {
    pub fn new(tx: UnboundedSender<BindingEvent<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Clone + Send + Sync> BindingConsumer<T> for ChannelConsumer<T> {
    fn on_snapshot(&self, items: &[T]) {
        let _ = self.tx.send(BindingEvent::Snapshot(items.to_vec()));
    }

    fn on_error(&self, error: &StoreError) {
        let _ = self.tx.send(BindingEvent::Error(error.to_string()));
    }
}

/// Newest-first ordering on a creation timestamp.
pub fn newest_first<T>(created_at: fn(&T) -> i64) -> impl Fn(&T, &T) -> Ordering + Send + Sync {
    move |a, b| created_at(b).cmp(&created_at(a))
}
