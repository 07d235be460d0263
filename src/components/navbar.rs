//! Navbar Component
//!
//! App title plus the signed-in user's avatar menu.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (menu_open, set_menu_open) = signal(false);

    let sign_out = move |_| {
        set_menu_open.set(false);
        let auth = ctx.auth();
        spawn_local(async move {
            if let Err(err) = auth.sign_out().await {
                log::error!("[auth] sign-out failed: {}", err);
            }
        });
    };

    view! {
        <nav class="navbar">
            <span class="navbar-title">"Food Inventory"</span>
            {move || store.user().get().map(|user| {
                let email = user.email.clone().unwrap_or_default();
                let avatar = match user.photo_url.clone() {
                    Some(url) => view! { <img class="avatar-img" src=url alt="" /> }.into_any(),
                    None => view! { <span class="avatar-initials">{user.initials()}</span> }.into_any(),
                };
                view! {
                    <div class="navbar-user">
                        <button
                            class="avatar-btn"
                            title=user.label().to_string()
                            on:click=move |_| set_menu_open.update(|open| *open = !*open)
                        >
                            {avatar}
                        </button>
                        <Show when=move || menu_open.get()>
                            <div class="user-menu">
                                <p class="user-menu-email">"Signed in as " {email.clone()}</p>
                                <button class="user-menu-item" on:click=sign_out>"Log Out"</button>
                            </div>
                        </Show>
                    </div>
                }
            })}
        </nav>
    }
}
