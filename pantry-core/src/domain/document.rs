//! Document Model
//!
//! Untyped documents as the store holds them, and the field maps used to write them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Opaque, store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One record in a collection: an identifier plus named fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// The full ordered result of a live query at one point in time
pub type Snapshot = Vec<Document>;

/// A value to write into a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    /// Replaced by the store with its own clock at write time
    ServerTimestamp,
}

/// Field name -> value for create and partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteFields(BTreeMap<String, FieldValue>);

impl WriteFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any value that serializes to a JSON object.
    ///
    /// Fields serialized as `null` are left out, so `Option` fields marked
    /// `skip_serializing_if` and plain `None`s both mean "not written".
    pub fn from_serialize<S: Serialize>(value: &S) -> StoreResult<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(
                map.into_iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k, FieldValue::Value(v)))
                    .collect(),
            )),
            other => Err(StoreError::InvalidData(format!(
                "expected an object of fields, got {}",
                other
            ))),
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), FieldValue::Value(value));
    }

    /// Stamp `field` with the store's clock
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.0.insert(field.into(), FieldValue::ServerTimestamp);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl IntoIterator for WriteFields {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Partial {
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        note: Option<String>,
    }

    #[test]
    fn test_from_serialize_skips_absent_fields() {
        let fields = WriteFields::from_serialize(&Partial {
            quantity: Some(10.0),
            unit: None,
            note: None,
        })
        .unwrap();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("quantity"), Some(&FieldValue::Value(json!(10.0))));
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        let err = WriteFields::from_serialize(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_server_timestamp_marker() {
        let fields = WriteFields::new().with_server_timestamp("updatedAt");
        assert_eq!(fields.get("updatedAt"), Some(&FieldValue::ServerTimestamp));
    }
}
