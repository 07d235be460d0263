//! Store Layer - Core Traits
//!
//! Defines the abstract interface to a document store.
//! Implementations can use SQLite, in-memory, a remote service, etc.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::subscription::Subscription;
use crate::domain::{DocumentId, Snapshot, WriteFields};
use crate::error::StoreResult;

/// A collection and the field its live query is ordered by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    pub order_by: String,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, order_by: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order_by: order_by.into(),
        }
    }
}

/// Document store primitives consumed by the live view models
///
/// Writes are async and may fail. Subscribing never fails synchronously: a
/// query that cannot be served yields an `Err` event on the returned stream.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a live query.
    ///
    /// The current ordered snapshot is delivered first, then a full snapshot
    /// after every change to the collection, until the subscription is released.
    fn subscribe(&self, spec: &CollectionSpec) -> Subscription;

    /// One-shot ordered query
    async fn query(&self, spec: &CollectionSpec) -> StoreResult<Snapshot>;

    /// Create a document, returning its store-assigned identifier
    async fn create(&self, collection: &str, fields: WriteFields) -> StoreResult<DocumentId>;

    /// Merge `fields` into an existing document
    async fn update(&self, collection: &str, id: &DocumentId, fields: WriteFields) -> StoreResult<()>;

    /// Delete a document
    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()>;
}
