// Library crate for the set designer service
// This file exposes the public API for integration tests

pub mod archetype;
pub mod card;
pub mod config;
pub mod db;
pub mod distribution;
pub mod router;
pub mod set;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use router::build_router;
pub use shared::{AppError, AppState};
