//! Live collection
//!
//! Keeps a local ordered snapshot of one collection in step with the store.
//! Only pushes from the live query change the snapshot; writes go straight
//! to the store and show up with the next push.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::domain::{DocumentId, Entity, WriteFields};
use crate::error::{StoreError, ViewError};
use crate::store::{lock, CollectionSpec, DocumentStore, SnapshotEvent, SnapshotStream, SubscriptionHandle};

/// What a view renders from
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    /// True until the first push (or subscription failure)
    pub loading: bool,
    pub last_error: Option<ViewError>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            last_error: None,
        }
    }
}

struct Shared<T> {
    spec: CollectionSpec,
    state: watch::Sender<CollectionState<T>>,
    disposed: AtomicBool,
}

impl<T: Entity> Shared<T> {
    fn apply(&self, event: SnapshotEvent) -> bool {
        if self.disposed.load(Ordering::SeqCst) {
            log::debug!("[live:{}] dropping push after dispose", self.spec.name);
            return false;
        }
        match event {
            Ok(snapshot) => {
                let total = snapshot.len();
                let items: Vec<T> = snapshot
                    .iter()
                    .filter_map(|doc| match T::from_document(doc) {
                        Ok(item) => Some(item),
                        Err(err) => {
                            log::warn!("[live:{}] skipping document {}: {}", self.spec.name, doc.id, err);
                            None
                        }
                    })
                    .collect();
                log::debug!("[live:{}] snapshot of {}/{} documents", self.spec.name, items.len(), total);
                self.state.send_replace(CollectionState {
                    items,
                    loading: false,
                    last_error: None,
                });
            }
            Err(err) => {
                log::warn!("[live:{}] subscription failed: {}", self.spec.name, err);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.last_error = Some(ViewError::SubscriptionFailed(err));
                });
            }
        }
        true
    }
}

/// Drives one live query. Spawn [`SyncTask::run`] on the host's executor.
#[must_use = "the snapshot only updates while the task runs"]
pub struct SyncTask<T> {
    shared: Arc<Shared<T>>,
    stream: SnapshotStream,
}

impl<T: Entity> SyncTask<T> {
    /// Apply pushes until the stream ends or reports a failure
    pub async fn run(mut self) {
        while let Some(event) = self.stream.next().await {
            let failed = event.is_err();
            if !self.shared.apply(event) || failed {
                break;
            }
        }
        log::debug!("[live:{}] sync task finished", self.shared.spec.name);
    }
}

/// A live, read-through view of one collection
pub struct LiveCollection<T> {
    store: Arc<dyn DocumentStore>,
    shared: Arc<Shared<T>>,
    handle: Mutex<Option<SubscriptionHandle>>,
}

impl<T: Entity> LiveCollection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, spec: CollectionSpec) -> Self {
        Self {
            store,
            shared: Arc::new(Shared {
                spec,
                state: watch::Sender::new(CollectionState::default()),
                disposed: AtomicBool::new(false),
            }),
            handle: Mutex::new(None),
        }
    }

    pub fn spec(&self) -> &CollectionSpec {
        &self.shared.spec
    }

    /// Open the live query. A previous subscription of this instance is released first.
    pub fn subscribe(&self) -> SyncTask<T> {
        let (stream, handle) = self.store.subscribe(&self.shared.spec).split();
        if self.is_disposed() {
            handle.release();
        } else if let Some(previous) = lock(&self.handle).replace(handle) {
            previous.release();
        }
        log::debug!("[live:{}] subscribed, ordered by {}", self.shared.spec.name, self.shared.spec.order_by);
        SyncTask {
            shared: self.shared.clone(),
            stream,
        }
    }

    /// Apply one push. Returns `false` (and changes nothing) once disposed.
    pub fn apply(&self, event: SnapshotEvent) -> bool {
        self.shared.apply(event)
    }

    pub fn state(&self) -> CollectionState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.shared.state.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    pub fn last_error(&self) -> Option<ViewError> {
        self.shared.state.borrow().last_error.clone()
    }

    /// Receiver that wakes on every replacement of the state
    pub fn watch(&self) -> watch::Receiver<CollectionState<T>> {
        self.shared.state.subscribe()
    }

    pub async fn create(&self, fields: WriteFields) -> Result<DocumentId, ViewError> {
        let collection = &self.shared.spec.name;
        let id = self
            .store
            .create(collection, fields)
            .await
            .map_err(|err| self.write_failed("create", None, err))?;
        log::debug!("[live:{}] created {}", collection, id);
        Ok(id)
    }

    pub async fn update(&self, id: &DocumentId, fields: WriteFields) -> Result<(), ViewError> {
        self.store
            .update(&self.shared.spec.name, id, fields)
            .await
            .map_err(|err| self.write_failed("update", Some(id), err))
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), ViewError> {
        self.store
            .delete(&self.shared.spec.name, id)
            .await
            .map_err(|err| self.write_failed("delete", Some(id), err))
    }

    fn write_failed(&self, op: &str, id: Option<&DocumentId>, err: StoreError) -> ViewError {
        match id {
            Some(id) => log::warn!("[live:{}] {} {} failed: {}", self.shared.spec.name, op, id, err),
            None => log::warn!("[live:{}] {} failed: {}", self.shared.spec.name, op, err),
        }
        ViewError::WriteFailed(err)
    }

    /// Release the live query; later pushes are ignored. Idempotent.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = lock(&self.handle).take() {
            handle.release();
        }
        log::debug!("[live:{}] disposed", self.shared.spec.name);
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.load(Ordering::SeqCst)
    }
}

impl<T> Drop for LiveCollection<T> {
    fn drop(&mut self) {
        self.shared.disposed.store(true, Ordering::SeqCst);
    }
}
