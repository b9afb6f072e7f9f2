//! Front-end state for the registration and inventory views

pub mod inventory;
mod options_cache;
pub mod registration;
mod route;

pub use inventory::{InventoryView, ListController, ListState};
pub use options_cache::{humanize_code, OptionsCache};
pub use registration::{Redirect, Registered, RegistrationError, RegistrationForm};
pub use route::Route;
