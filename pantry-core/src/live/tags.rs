//! Tags view model (read-only)

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::{CollectionState, LiveCollection, SyncTask};
use crate::domain::Tag;
use crate::store::{CollectionSpec, DocumentStore};

pub struct TagsViewModel {
    collection: LiveCollection<Tag>,
}

impl TagsViewModel {
    pub fn new(store: Arc<dyn DocumentStore>, spec: CollectionSpec) -> Self {
        Self {
            collection: LiveCollection::new(store, spec),
        }
    }

    pub fn subscribe(&self) -> SyncTask<Tag> {
        self.collection.subscribe()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.collection.items()
    }

    pub fn loading(&self) -> bool {
        self.collection.is_loading()
    }

    pub fn watch(&self) -> watch::Receiver<CollectionState<Tag>> {
        self.collection.watch()
    }

    pub fn dispose(&self) {
        self.collection.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.collection.is_disposed()
    }
}
