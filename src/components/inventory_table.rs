//! Inventory Table Component

use leptos::prelude::*;

use crate::components::{DeleteConfirmButton, TagChips};
use crate::context::use_app_context;
use crate::models::{DocumentId, InventoryItem};
use crate::store::{use_app_store, AppStateStoreFields};

/// One row per item of the latest snapshot, in store order
#[component]
pub fn InventoryTable(
    #[prop(into)] on_edit: Callback<InventoryItem>,
    #[prop(into)] on_delete: Callback<DocumentId>,
) -> impl IntoView {
    let store = use_app_store();
    let config = use_app_context().config();

    view! {
        <table class="inventory-table">
            <thead>
                <tr>
                    <th>"NAME"</th>
                    <th>"QTY"</th>
                    <th>"CATEGORY"</th>
                    <th>"TAGS"</th>
                    <th class="actions-col">"ACTIONS"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || store.items().get()
                    key=|item| (item.id.clone(), item.updated_at)
                    children=move |item| {
                        let color = config.category_color(&item.category).to_string();
                        let unit_name = config.unit_label(&item.unit).to_string();
                        let id = item.id.clone();
                        let edit_target = item.clone();
                        view! {
                            <tr>
                                <td class="name-cell">{item.name.clone()}</td>
                                <td title=unit_name>{item.quantity_label()}</td>
                                <td>
                                    <span class=format!("category-chip chip-{}", color)>
                                        {item.category.clone()}
                                    </span>
                                </td>
                                <td><TagChips tags=item.tags.clone() /></td>
                                <td class="actions-col">
                                    <button
                                        class="edit-btn"
                                        title="Edit"
                                        on:click=move |_| on_edit.run(edit_target.clone())
                                    >
                                        "Edit"
                                    </button>
                                    <DeleteConfirmButton
                                        button_class="delete-btn"
                                        on_confirm=Callback::new(move |_| on_delete.run(id.clone()))
                                    />
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}
