//! Item form state
//!
//! What the add/edit modal holds between keystrokes, and how it turns into a
//! create or a partial update.

use crate::config::FormDefaults;
use crate::domain::{DocumentId, InventoryItem, ItemPatch, NewInventoryItem};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    /// Raw input text; parsed on save
    pub quantity: String,
    pub unit: String,
    pub category: String,
    pub tags: Vec<DocumentId>,
}

impl ItemDraft {
    /// Blank form for a new item
    pub fn new(defaults: &FormDefaults) -> Self {
        Self {
            name: String::new(),
            quantity: defaults.quantity.to_string(),
            unit: defaults.unit.clone(),
            category: defaults.category.clone(),
            tags: Vec::new(),
        }
    }

    /// Form populated from an existing item
    pub fn for_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            unit: item.unit.clone(),
            category: item.category.clone(),
            tags: item.tags.clone(),
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Unparseable or non-finite quantities ("NaN", "inf", "1e400") count as zero
    pub fn parsed_quantity(&self) -> f64 {
        self.quantity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .unwrap_or(0.0)
    }

    pub fn has_tag(&self, id: &DocumentId) -> bool {
        self.tags.contains(id)
    }

    pub fn toggle_tag(&mut self, id: DocumentId) {
        if let Some(pos) = self.tags.iter().position(|t| *t == id) {
            self.tags.remove(pos);
        } else {
            self.tags.push(id);
        }
    }

    /// `None` when the name is blank
    pub fn to_new_item(&self) -> Option<NewInventoryItem> {
        if !self.is_submittable() {
            return None;
        }
        Some(NewInventoryItem {
            name: self.name.trim().to_string(),
            quantity: self.parsed_quantity(),
            unit: self.unit.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        })
    }

    /// Only the fields that differ from `item`; `None` when the name is blank
    pub fn changes_from(&self, item: &InventoryItem) -> Option<ItemPatch> {
        let new = self.to_new_item()?;
        let mut patch = ItemPatch::default();
        if new.name != item.name {
            patch.name = Some(new.name);
        }
        if new.quantity != item.quantity {
            patch.quantity = Some(new.quantity);
        }
        if new.unit != item.unit {
            patch.unit = Some(new.unit);
        }
        if new.category != item.category {
            patch.category = Some(new.category);
        }
        if !same_tags(&new.tags, &item.tags) {
            patch.tags = Some(new.tags);
        }
        Some(patch)
    }
}

fn same_tags(a: &[DocumentId], b: &[DocumentId]) -> bool {
    let mut a: Vec<&DocumentId> = a.iter().collect();
    let mut b: Vec<&DocumentId> = b.iter().collect();
    a.sort();
    a.dedup();
    b.sort();
    b.dedup();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn existing() -> InventoryItem {
        InventoryItem {
            id: DocumentId::from("1"),
            name: "Existing Apple".to_string(),
            quantity: 5.0,
            unit: "kg".to_string(),
            category: "Produce".to_string(),
            tags: vec![DocumentId::from("tag1"), DocumentId::from("tag2")],
            updated_at: None,
        }
    }

    #[test]
    fn test_non_finite_quantity_counts_as_zero() {
        let mut draft = ItemDraft::new(&AppConfig::default().defaults);
        draft.name = "Salt".to_string();
        for text in ["NaN", "inf", "-infinity", "1e400", "abc", ""] {
            draft.quantity = text.to_string();
            assert_eq!(draft.parsed_quantity(), 0.0, "quantity {:?}", text);
            assert_eq!(draft.to_new_item().map(|item| item.quantity), Some(0.0));
        }
        draft.quantity = " 2.5 ".to_string();
        assert_eq!(draft.parsed_quantity(), 2.5);
    }

    #[test]
    fn test_blank_form_uses_defaults() {
        let mut draft = ItemDraft::new(&AppConfig::default().defaults);
        assert_eq!(draft.quantity, "1");
        assert_eq!(draft.unit, "pcs");
        assert_eq!(draft.category, "Pantry");

        draft.name = "Test Milk".to_string();
        assert_eq!(
            draft.to_new_item(),
            Some(NewInventoryItem::new("Test Milk", 1.0, "pcs", "Pantry"))
        );
    }

    #[test]
    fn test_blank_name_is_not_saved() {
        let mut draft = ItemDraft::new(&AppConfig::default().defaults);
        draft.name = "   ".to_string();
        assert!(draft.to_new_item().is_none());
        assert!(draft.changes_from(&existing()).is_none());
    }

    #[test]
    fn test_bad_quantity_becomes_zero() {
        let mut draft = ItemDraft::new(&AppConfig::default().defaults);
        draft.name = "Salt".to_string();
        draft.quantity = "lots".to_string();
        assert_eq!(draft.to_new_item().unwrap().quantity, 0.0);
    }

    #[test]
    fn test_edit_form_is_populated() {
        let draft = ItemDraft::for_item(&existing());
        assert_eq!(draft.name, "Existing Apple");
        assert_eq!(draft.quantity, "5");
        assert!(draft.has_tag(&DocumentId::from("tag1")));
    }

    #[test]
    fn test_unchanged_form_yields_empty_patch() {
        let mut draft = ItemDraft::for_item(&existing());
        draft.tags.reverse();
        assert!(draft.changes_from(&existing()).unwrap().is_empty());
    }

    #[test]
    fn test_patch_holds_only_changes() {
        let mut draft = ItemDraft::for_item(&existing());
        draft.quantity = "10".to_string();
        draft.toggle_tag(DocumentId::from("tag2"));

        let patch = draft.changes_from(&existing()).unwrap();
        assert_eq!(patch.quantity, Some(10.0));
        assert_eq!(patch.tags, Some(vec![DocumentId::from("tag1")]));
        assert!(patch.name.is_none());
        assert!(patch.unit.is_none());
        assert!(patch.category.is_none());
    }

    #[test]
    fn test_toggle_tag() {
        let mut draft = ItemDraft::new(&AppConfig::default().defaults);
        let tag = DocumentId::from("tag9");
        draft.toggle_tag(tag.clone());
        assert!(draft.has_tag(&tag));
        draft.toggle_tag(tag.clone());
        assert!(!draft.has_tag(&tag));
    }
}
