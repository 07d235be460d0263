//! Log Panel Component
//!
//! Collapsible view of the rolling logger's recent lines.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let toggle = move |_| {
        let next = !open.get_untracked();
        if next {
            set_lines.set(rolling_logger::recent_lines());
        }
        set_open.set(next);
    };

    view! {
        <footer class="log-panel">
            <button class="log-toggle" on:click=toggle>
                {move || if open.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || open.get()>
                <div class="log-lines">
                    <button class="log-refresh" on:click=move |_| set_lines.set(rolling_logger::recent_lines())>
                        "Refresh"
                    </button>
                    <pre>{move || lines.get().join("\n")}</pre>
                </div>
            </Show>
        </footer>
    }
}
