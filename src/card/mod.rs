// Public API - what other modules can use
pub use handlers::{create_card, delete_card, update_card};

// Internal modules
mod handlers;
pub mod mana;
pub mod models;
pub mod repository;
mod service;
pub mod types;
