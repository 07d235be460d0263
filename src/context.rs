//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;
use pantry_core::auth::AuthProvider;
use pantry_core::config::AppConfig;
use pantry_core::live::InventoryViewModel;
use pantry_core::store::DocumentStore;

/// App-wide services, available from sign-in screen onwards
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<Arc<AppConfig>>,
    documents: StoredValue<Arc<dyn DocumentStore>>,
    auth: StoredValue<Arc<dyn AuthProvider>>,
}

impl AppContext {
    pub fn new(config: Arc<AppConfig>, documents: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            config: StoredValue::new(config),
            documents: StoredValue::new(documents),
            auth: StoredValue::new(auth),
        }
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.get_value()
    }

    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        self.documents.get_value()
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        self.auth.get_value()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

/// The inventory view model mounted by the signed-in page; writes go through it
#[derive(Clone, Copy)]
pub struct LiveContext {
    inventory: StoredValue<Arc<InventoryViewModel>>,
}

impl LiveContext {
    pub fn new(inventory: Arc<InventoryViewModel>) -> Self {
        Self {
            inventory: StoredValue::new(inventory),
        }
    }

    pub fn inventory(&self) -> Arc<InventoryViewModel> {
        self.inventory.get_value()
    }
}

pub fn use_live_context() -> LiveContext {
    expect_context::<LiveContext>()
}
