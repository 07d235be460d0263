//! Inventory Item Entity
//!
//! A food-inventory record and the shapes used to create and patch it.

use serde::{Deserialize, Deserializer, Serialize};

use super::document::{DocumentId, WriteFields};
use super::entity::Entity;
use super::timestamp::Timestamp;
use crate::error::{StoreError, StoreResult};

/// Field the store stamps on every create and update
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// An inventory record as materialized from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: DocumentId,
    pub name: String,
    /// Display fields fall back to empty values so a sparse document still renders
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: String,
    /// Weak references into the tags collection
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<DocumentId>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl InventoryItem {
    /// "5 kg", "2.5 L"
    pub fn quantity_label(&self) -> String {
        format!("{} {}", self.quantity, self.unit)
    }
}

impl Entity for InventoryItem {
    fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// JSON has no encoding for NaN or infinity; such a quantity would be written as
/// null and silently dropped.
fn check_quantity(quantity: f64) -> StoreResult<()> {
    if quantity.is_finite() {
        Ok(())
    } else {
        Err(StoreError::InvalidData(format!("quantity {} is not a finite number", quantity)))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DocumentId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DocumentId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// All user-editable fields of a new item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<DocumentId>,
}

impl NewInventoryItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<DocumentId>) -> Self {
        self.tags = tags;
        self
    }

    /// Fields for the store's create primitive, stamped by the server
    pub fn to_fields(&self) -> StoreResult<WriteFields> {
        check_quantity(self.quantity)?;
        Ok(WriteFields::from_serialize(self)?.with_server_timestamp(UPDATED_AT_FIELD))
    }
}

/// Partial update: only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<DocumentId>>,
}

impl ItemPatch {
    pub fn quantity(quantity: f64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    /// Changed fields plus a refreshed server timestamp
    pub fn to_fields(&self) -> StoreResult<WriteFields> {
        if let Some(quantity) = self.quantity {
            check_quantity(quantity)?;
        }
        Ok(WriteFields::from_serialize(self)?.with_server_timestamp(UPDATED_AT_FIELD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, FieldValue};
    use serde_json::json;

    fn doc(id: &str, fields: serde_json::Value) -> Document {
        match fields {
            serde_json::Value::Object(map) => Document::new(id, map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_decode_item_without_tags() {
        let item = InventoryItem::from_document(&doc(
            "1",
            json!({"name": "Apple", "quantity": 5, "unit": "pcs", "category": "Produce"}),
        ))
        .unwrap();

        assert_eq!(item.id, DocumentId::from("1"));
        assert_eq!(item.quantity, 5.0);
        assert!(item.tags.is_empty());
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn test_decode_item_with_null_tags() {
        let item = InventoryItem::from_document(&doc(
            "2",
            json!({"name": "Milk", "quantity": 1.5, "unit": "L", "category": "Dairy", "tags": null}),
        ))
        .unwrap();
        assert!(item.tags.is_empty());
        assert_eq!(item.quantity_label(), "1.5 L");
    }

    #[test]
    fn test_decode_sparse_item_with_defaults() {
        let item = InventoryItem::from_document(&doc("4", json!({"name": "Salt"}))).unwrap();
        assert_eq!(item.name, "Salt");
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.unit, "");
        assert_eq!(item.category, "");
    }

    #[test]
    fn test_decode_rejects_wrong_type() {
        let result = InventoryItem::from_document(&doc("5", json!({"name": "Salt", "quantity": "lots"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_quantity_is_rejected() {
        for quantity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = NewInventoryItem::new("Salt", quantity, "pcs", "Pantry").to_fields().unwrap_err();
            assert!(matches!(err, StoreError::InvalidData(_)));
            assert!(matches!(ItemPatch::quantity(quantity).to_fields(), Err(StoreError::InvalidData(_))));
        }
    }

    #[test]
    fn test_decode_rejects_missing_name() {
        let result = InventoryItem::from_document(&doc("3", json!({"quantity": 1})));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_item_fields_carry_server_timestamp() {
        let fields = NewInventoryItem::new("Banana", 3.0, "kg", "Pantry").to_fields().unwrap();

        assert_eq!(fields.get("name"), Some(&FieldValue::Value(json!("Banana"))));
        assert_eq!(fields.get("quantity"), Some(&FieldValue::Value(json!(3.0))));
        assert_eq!(fields.get("unit"), Some(&FieldValue::Value(json!("kg"))));
        assert_eq!(fields.get("category"), Some(&FieldValue::Value(json!("Pantry"))));
        assert_eq!(fields.get(UPDATED_AT_FIELD), Some(&FieldValue::ServerTimestamp));
        assert!(!fields.contains("id"));
    }

    #[test]
    fn test_patch_sends_only_changed_fields() {
        let fields = ItemPatch::quantity(10.0).to_fields().unwrap();
        let names: Vec<&str> = fields.field_names().collect();
        assert_eq!(names, vec!["quantity", UPDATED_AT_FIELD]);
    }
}
