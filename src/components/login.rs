//! Login Component
//!
//! Shown whenever no user is signed in.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;

#[component]
pub fn Login() -> impl IntoView {
    let ctx = use_app_context();
    let (pending, set_pending) = signal(false);
    let (error, set_error) = signal(None::<String>);

    let sign_in = move |_| {
        set_pending.set(true);
        set_error.set(None);
        let auth = ctx.auth();
        spawn_local(async move {
            let result = auth.sign_in().await;
            // This view unmounts on success, so the signals may be gone
            let _ = set_pending.try_set(false);
            match result {
                Ok(user) => {
                    let _ = rolling_logger::info(&format!("signed in as {}", user.uid));
                }
                Err(err) => {
                    let _ = rolling_logger::error(&format!("sign-in failed: {}", err));
                    let _ = set_error.try_set(Some(err.to_string()));
                }
            }
        });
    };

    view! {
        <div class="login-card">
            <h2>"Welcome to PantryApp"</h2>
            <p class="login-hint">"Sign in to manage your food inventory."</p>
            <button class="primary-btn" disabled=move || pending.get() on:click=sign_in>
                {move || if pending.get() { "Signing in..." } else { "Sign in" }}
            </button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </div>
    }
}
