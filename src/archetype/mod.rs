// Public API - what other modules can use
pub use handlers::{create_archetype, delete_archetype, list_archetypes, update_archetype};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
