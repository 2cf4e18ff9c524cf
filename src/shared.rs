use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::archetype::repository::{ArchetypeRepository, InMemoryArchetypeRepository};
use crate::card::repository::{CardRepository, InMemoryCardRepository};
use crate::config::MAX_NAME_LENGTH;
use crate::set::repository::{InMemorySetRepository, SetRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub set_repository: Arc<dyn SetRepository + Send + Sync>,
    pub card_repository: Arc<dyn CardRepository + Send + Sync>,
    pub archetype_repository: Arc<dyn ArchetypeRepository + Send + Sync>,
}

impl AppState {
    pub fn new(
        set_repository: Arc<dyn SetRepository + Send + Sync>,
        card_repository: Arc<dyn CardRepository + Send + Sync>,
        archetype_repository: Arc<dyn ArchetypeRepository + Send + Sync>,
    ) -> Self {
        Self {
            set_repository,
            card_repository,
            archetype_repository,
        }
    }

    /// State backed entirely by in-memory repositories
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySetRepository::new()),
            Arc::new(InMemoryCardRepository::new()),
            Arc::new(InMemoryArchetypeRepository::new()),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Body returned by update and delete endpoints
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trims a user-supplied name and checks it is present and not too long
pub fn require_name(raw: &str, what: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!("{} name is required", what)));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "{} name must be at most {} characters",
            what, MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

/// Rejects a free-text field longer than its stored column allows
pub fn check_length(value: &str, max: usize, field: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Serde helper telling an absent field (`None`) apart from an explicit
/// null (`Some(None)`)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
