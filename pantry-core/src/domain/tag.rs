//! Tag Entity
//!
//! Tags are referenced from items by identifier only. Lookups go through
//! [`TagIndex`], where a dangling reference simply resolves to nothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::document::DocumentId;
use super::entity::Entity;

/// A label for categorizing items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: DocumentId,
    pub label: String,
    /// Display color (e.g. "#ff0000"), not validated; empty when absent
    #[serde(default)]
    pub color: String,
}

impl Tag {
    pub fn new(id: impl Into<DocumentId>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

impl Entity for Tag {
    fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// Identifier lookup over a tag snapshot
pub struct TagIndex<'a> {
    by_id: HashMap<&'a DocumentId, &'a Tag>,
}

impl<'a> TagIndex<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        Self {
            by_id: tags.iter().map(|tag| (&tag.id, tag)).collect(),
        }
    }

    /// `None` when no tag with this identifier is materialized
    pub fn resolve(&self, id: &DocumentId) -> Option<&'a Tag> {
        self.by_id.get(id).copied()
    }

    /// Resolve in reference order, skipping dangling and repeated identifiers
    pub fn resolve_all(&self, ids: &[DocumentId]) -> Vec<&'a Tag> {
        let mut resolved: Vec<&'a Tag> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(tag) = self.resolve(id) {
                if !resolved.iter().any(|t| t.id == tag.id) {
                    resolved.push(tag);
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<Tag> {
        vec![
            Tag::new("tag1", "Urgent", "#ff0000"),
            Tag::new("tag2", "Low Stock", "#ffff00"),
        ]
    }

    #[test]
    fn test_decode_tag_without_color() {
        let mut fields = serde_json::Map::new();
        fields.insert("label".to_string(), serde_json::json!("Organic"));
        let tag = Tag::from_document(&crate::domain::Document::new("tag3", fields)).unwrap();
        assert_eq!(tag.label, "Organic");
        assert_eq!(tag.color, "");
    }

    #[test]
    fn test_unmatched_reference_resolves_to_nothing() {
        let snapshot = vec![Tag::new("tag2", "Low Stock", "#ffff00")];
        let index = TagIndex::new(&snapshot);

        assert!(index.resolve(&DocumentId::from("tag1")).is_none());
        assert!(index.resolve_all(&[DocumentId::from("tag1")]).is_empty());
    }

    #[test]
    fn test_resolve_all_keeps_reference_order() {
        let snapshot = tags();
        let index = TagIndex::new(&snapshot);
        let resolved = index.resolve_all(&[
            DocumentId::from("tag2"),
            DocumentId::from("missing"),
            DocumentId::from("tag1"),
            DocumentId::from("tag2"),
        ]);

        let labels: Vec<&str> = resolved.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Low Stock", "Urgent"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot: Vec<Tag> = Vec::new();
        let index = TagIndex::new(&snapshot);
        assert!(index.resolve_all(&[DocumentId::from("tag1")]).is_empty());
    }
}
