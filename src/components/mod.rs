//! UI Components
//!
//! Leptos components of the inventory app.

mod navbar;
mod login;
mod inventory_page;
mod inventory_table;
mod item_modal;
mod tag_chips;
mod delete_confirm_button;
mod log_panel;

pub use navbar::Navbar;
pub use login::Login;
pub use inventory_page::InventoryPage;
pub use inventory_table::InventoryTable;
pub use item_modal::{ItemModal, ModalTarget};
pub use tag_chips::TagChips;
pub use delete_confirm_button::DeleteConfirmButton;
pub use log_panel::LogPanel;
