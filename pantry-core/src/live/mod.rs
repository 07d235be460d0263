//! Live View Models
//!
//! One instance per collection kind, mounted for the lifetime of a view.

mod collection;
mod inventory;
mod tags;


pub use collection::{CollectionState, LiveCollection, SyncTask};
pub use inventory::InventoryViewModel;
pub use tags::TagsViewModel;
