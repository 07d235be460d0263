//! Domain Layer
//!
//! Documents as the store holds them, and the typed entities decoded from them.

mod document;
mod entity;
mod item;
mod tag;
mod timestamp;

pub use document::{Document, DocumentId, FieldValue, Snapshot, WriteFields};
pub use entity::Entity;
pub use item::{InventoryItem, ItemPatch, NewInventoryItem, UPDATED_AT_FIELD};
pub use tag::{Tag, TagIndex};
pub use timestamp::Timestamp;
