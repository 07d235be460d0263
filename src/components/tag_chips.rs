//! Tag Chips Component
//!
//! Resolves an item's tag references against the live tag list. References
//! with no matching tag render nothing.

use leptos::prelude::*;

use crate::models::{DocumentId, TagIndex};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn TagChips(tags: Vec<DocumentId>) -> impl IntoView {
    let store = use_app_store();

    view! {
        <span class="tag-chips">
            {move || store.tags().with(|all| {
                TagIndex::new(all)
                    .resolve_all(&tags)
                    .into_iter()
                    .map(|tag| view! {
                        <span class="tag-chip" style=format!("background-color: {}", tag.color)>
                            {tag.label.clone()}
                        </span>
                    })
                    .collect_view()
            })}
        </span>
    }
}
