// Public API - what other modules can use
pub use handlers::{create_set, delete_set, get_grid, get_set, list_sets, number_crunch, update_set};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
