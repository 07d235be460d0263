//! Item Modal Component
//!
//! Add/edit form. Saving delegates to the inventory view model; the list
//! picks up the result from the next push, never from the form.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app_context, use_live_context};
use crate::models::{DocumentId, InventoryItem, ItemDraft, ItemPatch, NewInventoryItem};
use crate::store::{use_app_store, AppStateStoreFields};

/// What the modal is open for
#[derive(Debug, Clone, PartialEq)]
pub enum ModalTarget {
    New,
    Edit(InventoryItem),
}

enum SaveRequest {
    Create(NewInventoryItem),
    Update(DocumentId, ItemPatch),
}

#[component]
pub fn ItemModal(target: RwSignal<Option<ModalTarget>>) -> impl IntoView {
    let config = use_app_context().config();
    let live = use_live_context();
    let store = use_app_store();

    let defaults = config.defaults.clone();
    let draft = RwSignal::new(ItemDraft::new(&defaults));
    let saving = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    // Repopulate whenever the modal opens
    Effect::new(move |_| {
        let next = match target.get() {
            Some(ModalTarget::New) => ItemDraft::new(&defaults),
            Some(ModalTarget::Edit(item)) => ItemDraft::for_item(&item),
            None => return,
        };
        draft.set(next);
        error.set(None);
        saving.set(false);
    });

    let close = move || {
        if !saving.get_untracked() {
            target.set(None);
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let Some(mode) = target.get_untracked() else {
            return;
        };
        let current = draft.get_untracked();
        // A blank name makes Save a no-op
        let request = match &mode {
            ModalTarget::New => current.to_new_item().map(SaveRequest::Create),
            ModalTarget::Edit(item) => current
                .changes_from(item)
                .map(|patch| SaveRequest::Update(item.id.clone(), patch)),
        };
        let Some(request) = request else {
            return;
        };
        if let SaveRequest::Update(_, patch) = &request {
            if patch.is_empty() {
                target.set(None);
                return;
            }
        }

        saving.set(true);
        error.set(None);
        let vm = live.inventory();
        spawn_local(async move {
            let result = match request {
                SaveRequest::Create(item) => vm.create(item).await.map(|_| ()),
                SaveRequest::Update(id, patch) => vm.update(&id, patch).await,
            };
            let _ = saving.try_set(false);
            match result {
                Ok(()) => {
                    let _ = target.try_set(None);
                }
                Err(err) => {
                    let _ = rolling_logger::error(&format!("save failed: {}", err));
                    let _ = error.try_set(Some(err.to_string()));
                }
            }
        });
    };

    let title = move || match target.get() {
        Some(ModalTarget::Edit(_)) => "Edit Item",
        _ => "Add Item",
    };

    let units = config.units.clone();
    let categories = config.categories.clone();

    view! {
        <Show when=move || target.with(Option::is_some)>
            <div class="modal-backdrop" on:click=move |_| close()>
                <form
                    class="modal"
                    on:click=|ev| ev.stop_propagation()
                    on:submit=save
                >
                    <h2 class="modal-title">{title}</h2>

                    <label class="field">
                        <span>"Name"</span>
                        <input
                            type="text"
                            required
                            prop:value=move || draft.with(|d| d.name.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.name = value);
                            }
                        />
                    </label>

                    <div class="field-row">
                        <label class="field">
                            <span>"Quantity"</span>
                            <input
                                type="number"
                                step="any"
                                prop:value=move || draft.with(|d| d.quantity.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    draft.update(|d| d.quantity = value);
                                }
                            />
                        </label>

                        <label class="field">
                            <span>"Unit"</span>
                            <select
                                prop:value=move || draft.with(|d| d.unit.clone())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    draft.update(|d| d.unit = value);
                                }
                            >
                                {units.iter().map(|unit| {
                                    let key = unit.key.clone();
                                    let selected_key = key.clone();
                                    view! {
                                        <option
                                            value=key
                                            selected=move || draft.with(|d| d.unit == selected_key)
                                        >
                                            {unit.label.clone()}
                                        </option>
                                    }
                                }).collect_view()}
                            </select>
                        </label>
                    </div>

                    <label class="field">
                        <span>"Category"</span>
                        <select
                            prop:value=move || draft.with(|d| d.category.clone())
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.category = value);
                            }
                        >
                            {categories.iter().map(|category| {
                                let key = category.key.clone();
                                let selected_key = key.clone();
                                view! {
                                    <option
                                        value=key
                                        selected=move || draft.with(|d| d.category == selected_key)
                                    >
                                        {category.label.clone()}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                    </label>

                    <fieldset class="field tag-picker">
                        <legend>"Tags"</legend>
                        {move || store.tags().get().into_iter().map(|tag| {
                            let checked_id = tag.id.clone();
                            let toggle_id = tag.id.clone();
                            view! {
                                <label class="tag-option">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || draft.with(|d| d.has_tag(&checked_id))
                                        on:change=move |_| draft.update(|d| d.toggle_tag(toggle_id.clone()))
                                    />
                                    <span class="tag-chip" style=format!("background-color: {}", tag.color)>
                                        {tag.label.clone()}
                                    </span>
                                </label>
                            }
                        }).collect_view()}
                    </fieldset>

                    {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}

                    <div class="modal-actions">
                        <button type="button" class="secondary-btn" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary-btn" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
