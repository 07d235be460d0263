//! In-memory document store
//!
//! Backs the browser demo and the tests. Writes and pushes happen under one
//! lock, so every subscriber sees snapshots in write order.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ordering::ordered_snapshot;
use super::registry::SubscriberRegistry;
use super::subscription::Subscription;
use super::traits::{CollectionSpec, DocumentStore};
use super::{apply_write, generate_id, lock};
use crate::config::Seed;
use crate::domain::{Document, DocumentId, Snapshot, WriteFields};
use crate::error::{StoreError, StoreResult};

type Collection = BTreeMap<DocumentId, Map<String, Value>>;

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Collection>,
    subscribers: SubscriberRegistry,
    next_id: u64,
    write_fault: Option<StoreError>,
    denied: HashMap<String, StoreError>,
}

fn collection_snapshot(collections: &HashMap<String, Collection>, spec: &CollectionSpec) -> Snapshot {
    let docs = collections
        .get(&spec.name)
        .into_iter()
        .flat_map(|c| c.iter())
        .map(|(id, fields)| Document::new(id.clone(), fields.clone()));
    ordered_snapshot(docs, &spec.order_by)
}

impl MemoryState {
    fn snapshot(&self, spec: &CollectionSpec) -> Snapshot {
        collection_snapshot(&self.collections, spec)
    }

    fn notify(&mut self, collection: &str) {
        let MemoryState {
            collections,
            subscribers,
            ..
        } = self;
        subscribers.notify(collection, |spec| Ok(collection_snapshot(collections, spec)));
    }

    fn check_writable(&self) -> StoreResult<()> {
        match &self.write_fault {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Thread-safe in-process store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated from a seed document
    pub fn seeded(seed: &Seed) -> Self {
        let store = Self::new();
        for (collection, docs) in &seed.collections {
            for doc in docs {
                store.insert(collection, doc.id.clone(), doc.fields.clone());
            }
        }
        store
    }

    /// Put a document with a caller-chosen identifier, replacing any existing one
    pub fn insert(&self, collection: &str, id: impl Into<DocumentId>, fields: Map<String, Value>) {
        let mut state = lock(&self.inner);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), fields);
        state.notify(collection);
    }

    pub fn document(&self, collection: &str, id: &DocumentId) -> Option<Document> {
        let state = lock(&self.inner);
        state
            .collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone()))
    }

    pub fn len(&self, collection: &str) -> usize {
        lock(&self.inner).collections.get(collection).map_or(0, |c| c.len())
    }

    /// Number of open live queries on `collection`
    pub fn subscriber_count(&self, collection: &str) -> usize {
        lock(&self.inner).subscribers.count(collection)
    }

    /// Make every write fail with `err` until called with `None`
    pub fn reject_writes(&self, err: Option<StoreError>) {
        lock(&self.inner).write_fault = err;
    }

    /// Refuse new live queries on `collection`
    pub fn deny_subscriptions(&self, collection: &str, err: StoreError) {
        lock(&self.inner).denied.insert(collection.to_string(), err);
    }

    /// Break every open live query on `collection` with `err`
    pub fn break_subscriptions(&self, collection: &str, err: StoreError) {
        lock(&self.inner).subscribers.fail(collection, &err);
    }

    fn release_fn(&self) -> impl FnOnce(u64) + Send + 'static {
        let weak: Weak<Mutex<MemoryState>> = Arc::downgrade(&self.inner);
        move |id| {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).subscribers.remove(id);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn subscribe(&self, spec: &CollectionSpec) -> Subscription {
        let release = self.release_fn();
        let mut state = lock(&self.inner);
        if let Some(err) = state.denied.get(&spec.name) {
            log::warn!("[memory-store] subscription to {} denied: {}", spec.name, err);
            return Subscription::failed(err.clone());
        }
        let initial = state.snapshot(spec);
        state.subscribers.register(spec, initial, release)
    }

    async fn query(&self, spec: &CollectionSpec) -> StoreResult<Snapshot> {
        let state = lock(&self.inner);
        if let Some(err) = state.denied.get(&spec.name) {
            return Err(err.clone());
        }
        Ok(state.snapshot(spec))
    }

    async fn create(&self, collection: &str, fields: WriteFields) -> StoreResult<DocumentId> {
        let mut state = lock(&self.inner);
        state.check_writable()?;

        state.next_id += 1;
        let id = generate_id(state.next_id);
        let mut doc = Map::new();
        apply_write(&mut doc, fields);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        state.notify(collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: WriteFields) -> StoreResult<()> {
        let mut state = lock(&self.inner);
        state.check_writable()?;

        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        apply_write(doc, fields);
        state.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()> {
        let mut state = lock(&self.inner);
        state.check_writable()?;

        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();
        if removed {
            state.notify(collection);
        }
        Ok(())
    }
}
