//! Pantry core
//!
//! Domain types, document stores and the live view models that keep a local
//! snapshot of a collection in step with a store. Everything here is free of
//! UI concerns so the same code drives the browser frontend and native tests.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod live;
pub mod store;

pub use config::{AppConfig, Seed};
pub use domain::{DocumentId, InventoryItem, ItemPatch, NewInventoryItem, Tag, TagIndex, Timestamp};
pub use error::{StoreError, StoreResult, ViewError};
pub use live::{CollectionState, InventoryViewModel, TagsViewModel};
pub use store::{CollectionSpec, DocumentStore, MemoryStore};
