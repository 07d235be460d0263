//! Shared Data Models
//!
//! The UI renders the core crate's types directly.

pub use pantry_core::auth::{AuthState, User};
pub use pantry_core::domain::{DocumentId, InventoryItem, ItemPatch, NewInventoryItem, Tag, TagIndex};
pub use pantry_core::form::ItemDraft;
pub use pantry_core::live::CollectionState;
