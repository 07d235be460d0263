//! Domain Layer - Core Entity Trait
//!
//! Every materialized record is decoded from a store document and keeps the
//! document's identifier.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::document::{Document, DocumentId};
use crate::error::StoreResult;

/// Core trait for records held by a live collection
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Returns the entity's store-assigned identifier
    fn id(&self) -> &DocumentId;

    /// Decode a store document.
    ///
    /// The identifier is injected as an `id` field before deserializing, so
    /// implementors only need `#[derive(Deserialize)]` with an `id` member.
    fn from_document(doc: &Document) -> StoreResult<Self> {
        let mut fields = doc.fields.clone();
        fields.insert("id".to_string(), Value::String(doc.id.as_str().to_string()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}
