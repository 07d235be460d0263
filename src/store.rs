//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The live view
//! models own the data; this store only mirrors their latest state for
//! rendering.

use std::sync::Weak;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pantry_core::live::{InventoryViewModel, TagsViewModel};
use reactive_stores::Store;
use tokio::sync::watch;

use crate::models::{AuthState, CollectionState, InventoryItem, Tag, User};

/// How long a transient notice stays on screen
const NOTICE_MS: u32 = 4_000;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Latest inventory snapshot, in store order
    pub items: Vec<InventoryItem>,
    /// Latest tag snapshot
    pub tags: Vec<Tag>,
    /// True until the first inventory push
    pub loading: bool,
    /// Subscription failure shown in the banner
    pub last_error: Option<String>,
    /// Transient message, e.g. a failed delete
    pub notice: Option<String>,
    pub user: Option<User>,
    pub auth_initializing: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading: true,
            auth_initializing: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Mirroring
// ========================

/// Copy every value published on `rx` into the UI via `apply`, until `apply`
/// reports that its target is gone or the sender is dropped.
pub fn spawn_mirror<T>(mut rx: watch::Receiver<T>, mut apply: impl FnMut(T) -> bool + 'static)
where
    T: Clone + 'static,
{
    spawn_local(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            if !apply(value) {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
}

// ========================
// Store Helper Functions
// ========================

/// Mirror an inventory state. Returns `false` once the store is disposed.
pub fn store_set_inventory(store: &AppStore, state: CollectionState<InventoryItem>) -> bool {
    let error = state.last_error.map(|err| err.to_string());
    store.items().try_set(state.items).is_none()
        && store.loading().try_set(state.loading).is_none()
        && store.last_error().try_set(error).is_none()
}

/// Mirror a tag state. Returns `false` once the store is disposed.
pub fn store_set_tags(store: &AppStore, state: CollectionState<Tag>) -> bool {
    store.tags().try_set(state.items).is_none()
}

/// Mirror the auth state. Returns `false` once the store is disposed.
pub fn store_set_auth(store: &AppStore, state: AuthState) -> bool {
    store.user().try_set(state.user).is_none()
        && store.auth_initializing().try_set(state.initializing).is_none()
}

/// Mirror an inventory state while `vm` is mounted. A push already queued when
/// the page was torn down must not write the previous user's items back.
pub fn store_mirror_inventory(
    store: &AppStore,
    vm: &Weak<InventoryViewModel>,
    state: CollectionState<InventoryItem>,
) -> bool {
    let mounted = vm.upgrade().is_some_and(|vm| !vm.is_disposed());
    mounted && store_set_inventory(store, state)
}

/// Mirror a tag state while `vm` is mounted
pub fn store_mirror_tags(store: &AppStore, vm: &Weak<TagsViewModel>, state: CollectionState<Tag>) -> bool {
    let mounted = vm.upgrade().is_some_and(|vm| !vm.is_disposed());
    mounted && store_set_tags(store, state)
}

/// Forget the inventory when its view unmounts (e.g. on sign-out)
pub fn store_reset_inventory(store: &AppStore) {
    let _ = store.items().try_set(Vec::new());
    let _ = store.tags().try_set(Vec::new());
    let _ = store.loading().try_set(true);
    let _ = store.last_error().try_set(None);
}

pub fn store_dismiss_error(store: &AppStore) {
    store.last_error().set(None);
}

/// Show `message` for a few seconds, unless a newer notice replaced it
pub fn store_flash_notice(store: AppStore, message: String) {
    store.notice().set(Some(message.clone()));
    spawn_local(async move {
        TimeoutFuture::new(NOTICE_MS).await;
        let still_shown = store
            .notice()
            .try_with_untracked(|current| current.as_deref() == Some(message.as_str()))
            .unwrap_or(false);
        if still_shown {
            let _ = store.notice().try_set(None);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pantry_core::store::{CollectionSpec, MemoryStore};

    use crate::models::DocumentId;

    fn pushed(names: &[&str]) -> CollectionState<InventoryItem> {
        CollectionState {
            items: names
                .iter()
                .map(|name| InventoryItem {
                    id: DocumentId::from(*name),
                    name: name.to_string(),
                    quantity: 1.0,
                    unit: "pcs".to_string(),
                    category: "Pantry".to_string(),
                    tags: Vec::new(),
                    updated_at: None,
                })
                .collect(),
            loading: false,
            last_error: None,
        }
    }

    #[test]
    fn test_late_push_after_teardown_is_not_mirrored() {
        let owner = Owner::new();
        owner.set();
        let store = Store::new(AppState::new());
        let vm = Arc::new(InventoryViewModel::new(
            Arc::new(MemoryStore::new()),
            CollectionSpec::new("inventory", "name"),
        ));
        let weak = Arc::downgrade(&vm);

        assert!(store_mirror_inventory(&store, &weak, pushed(&["Apple"])));
        assert_eq!(store.items().get_untracked().len(), 1);
        assert!(!store.loading().get_untracked());

        // Sign-out: the page disposes its view model, then resets the store
        vm.dispose();
        store_reset_inventory(&store);

        // A push that was already queued arrives afterwards
        assert!(!store_mirror_inventory(&store, &weak, pushed(&["Apple", "Milk"])));
        assert!(store.items().get_untracked().is_empty());
        assert!(store.loading().get_untracked());

        drop(vm);
        assert!(!store_mirror_inventory(&store, &weak, pushed(&["Bread"])));
        assert!(store.items().get_untracked().is_empty());
    }
}
