//! Inventory view model

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::{CollectionState, LiveCollection, SyncTask};
use crate::domain::{DocumentId, InventoryItem, ItemPatch, NewInventoryItem};
use crate::error::ViewError;
use crate::store::{CollectionSpec, DocumentStore};

/// Live inventory list with create/update/delete
pub struct InventoryViewModel {
    collection: LiveCollection<InventoryItem>,
}

impl InventoryViewModel {
    pub fn new(store: Arc<dyn DocumentStore>, spec: CollectionSpec) -> Self {
        Self {
            collection: LiveCollection::new(store, spec),
        }
    }

    pub fn subscribe(&self) -> SyncTask<InventoryItem> {
        self.collection.subscribe()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.collection.items()
    }

    pub fn loading(&self) -> bool {
        self.collection.is_loading()
    }

    pub fn last_error(&self) -> Option<ViewError> {
        self.collection.last_error()
    }

    pub fn state(&self) -> CollectionState<InventoryItem> {
        self.collection.state()
    }

    pub fn watch(&self) -> watch::Receiver<CollectionState<InventoryItem>> {
        self.collection.watch()
    }

    /// Ask the store to create `item`; it appears with the next push
    pub async fn create(&self, item: NewInventoryItem) -> Result<DocumentId, ViewError> {
        let fields = item.to_fields().map_err(ViewError::WriteFailed)?;
        self.collection.create(fields).await
    }

    /// Send only the patched fields. `id` is not checked against the local snapshot.
    pub async fn update(&self, id: &DocumentId, patch: ItemPatch) -> Result<(), ViewError> {
        let fields = patch.to_fields().map_err(ViewError::WriteFailed)?;
        self.collection.update(id, fields).await
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), ViewError> {
        self.collection.delete(id).await
    }

    pub fn dispose(&self) {
        self.collection.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.collection.is_disposed()
    }

    pub fn collection(&self) -> &LiveCollection<InventoryItem> {
        &self.collection
    }
}
