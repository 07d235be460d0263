//! PantryApp Frontend App
//!
//! App shell: wires the document store and auth provider, then gates the
//! inventory page behind a signed-in user.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use pantry_core::auth::{AuthProvider, LocalAuthProvider};
use pantry_core::config::{AppConfig, Seed};
use pantry_core::store::{DocumentStore, MemoryStore};
use reactive_stores::Store;

use crate::components::{InventoryPage, LogPanel, Login, Navbar};
use crate::context::AppContext;
use crate::store::{spawn_mirror, store_set_auth, AppState, AppStateStoreFields};

/// Demo data loaded into the in-memory store
const SEED_JSON: &str = include_str!("../seed.json");

fn seeded_store() -> MemoryStore {
    match Seed::from_json(SEED_JSON) {
        Ok(seed) => MemoryStore::seeded(&seed),
        Err(err) => {
            log::warn!("[app] seed data ignored: {}", err);
            MemoryStore::new()
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = Arc::new(AppConfig::default());
    let documents: Arc<dyn DocumentStore> = Arc::new(seeded_store());
    let auth = Arc::new(LocalAuthProvider::new(config.profile.clone()));

    let store = Store::new(AppState::new());
    provide_context(store);
    provide_context(AppContext::new(config, documents, auth.clone()));

    // Auth state drives which view is mounted
    spawn_mirror(auth.watch(), move |state| store_set_auth(&store, state));
    spawn_local(async move {
        if let Err(err) = auth.restore().await {
            log::error!("[auth] restore failed: {}", err);
        }
    });

    view! {
        <div class="app-layout">
            <Navbar />
            <main class="main-content">
                <Show
                    when=move || !store.auth_initializing().get()
                    fallback=|| view! { <p class="status">"Loading..."</p> }
                >
                    <Show
                        when=move || store.user().with(Option::is_some)
                        fallback=|| view! { <Login /> }
                    >
                        <InventoryPage />
                    </Show>
                </Show>
            </main>
            <LogPanel />
        </div>
    }
}
