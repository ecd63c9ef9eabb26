pub mod controller;
pub mod source;

pub use controller::{Command, RefreshController, RefreshSettings, SharedState, lock_state, new_shared_state};
pub use source::{HttpStatusClient, StatusSource};
