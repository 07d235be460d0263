//! Inventory Page Component
//!
//! Mounts the inventory and tag view models for as long as the signed-in
//! page is shown, and releases both subscriptions when it unmounts.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use pantry_core::live::{InventoryViewModel, TagsViewModel};

use crate::components::{InventoryTable, ItemModal, ModalTarget};
use crate::context::{use_app_context, LiveContext};
use crate::models::{DocumentId, InventoryItem};
use crate::store::{
    spawn_mirror, store_dismiss_error, store_flash_notice, store_mirror_inventory, store_mirror_tags,
    store_reset_inventory, use_app_store, AppStateStoreFields,
};

#[component]
pub fn InventoryPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let config = ctx.config();

    let inventory = Arc::new(InventoryViewModel::new(ctx.documents(), config.collections.inventory.clone()));
    let tags = Arc::new(TagsViewModel::new(ctx.documents(), config.collections.tags.clone()));

    let mounted_inventory = Arc::downgrade(&inventory);
    let mounted_tags = Arc::downgrade(&tags);
    spawn_mirror(inventory.watch(), move |state| store_mirror_inventory(&store, &mounted_inventory, state));
    spawn_mirror(tags.watch(), move |state| store_mirror_tags(&store, &mounted_tags, state));
    spawn_local(inventory.subscribe().run());
    spawn_local(tags.subscribe().run());

    let live = LiveContext::new(inventory.clone());
    provide_context(live);

    on_cleanup(move || {
        inventory.dispose();
        tags.dispose();
        store_reset_inventory(&store);
    });

    let modal = RwSignal::new(None::<ModalTarget>);

    let on_edit = Callback::new(move |item: InventoryItem| modal.set(Some(ModalTarget::Edit(item))));
    let on_delete = Callback::new(move |id: DocumentId| {
        let vm = live.inventory();
        spawn_local(async move {
            // The row disappears with the next push; only failures need feedback
            if let Err(err) = vm.delete(&id).await {
                let _ = rolling_logger::error(&format!("delete {} failed: {}", id, err));
                store_flash_notice(store, format!("Failed to delete item: {}", err));
            }
        });
    });

    view! {
        <section class="inventory-page">
            <header class="page-header">
                <h1>"Inventory"</h1>
                <button class="primary-btn" on:click=move |_| modal.set(Some(ModalTarget::New))>
                    "Add Item"
                </button>
            </header>

            {move || store.last_error().get().map(|message| view! {
                <div class="error-banner" role="alert">
                    <span>{message}</span>
                    <button class="banner-close" title="Dismiss" on:click=move |_| store_dismiss_error(&store)>
                        "×"
                    </button>
                </div>
            })}

            {move || store.notice().get().map(|message| view! {
                <div class="notice">{message}</div>
            })}

            <Show
                when=move || !store.loading().get()
                fallback=|| view! { <p class="status">"Loading inventory..."</p> }
            >
                <Show
                    when=move || store.items().with(|items| !items.is_empty())
                    fallback=|| view! { <p class="status">"No items found."</p> }
                >
                    <InventoryTable on_edit=on_edit on_delete=on_delete />
                </Show>
            </Show>

            <ItemModal target=modal />
        </section>
    }
}
