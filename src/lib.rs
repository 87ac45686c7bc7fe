// Leave Planner Library
// Exports all modules for testing and reuse

pub mod error;
pub mod interaction;
pub mod models;
pub mod services;
pub mod utils;
