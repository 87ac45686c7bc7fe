// Module exports for models

pub mod activity;
pub mod event;
pub mod leave;
pub mod settings;
pub mod snapshot;
