// Service module exports

pub mod config;
pub mod coordinator;
pub mod database;
pub mod day_index;
pub mod store;
