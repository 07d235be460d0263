//! PantryApp Frontend Entry Point

mod models;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

/// Lines of recent log output kept in memory
const LOG_CAPACITY: usize = 500;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init_logger("PantryApp", LOG_CAPACITY) {
        web_sys::console::warn_1(&format!("logger not installed: {}", err).into());
    }
    mount_to_body(App);
}
