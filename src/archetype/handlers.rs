use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::ArchetypeService,
    types::{ArchetypeResponse, CreateArchetypeRequest, UpdateArchetypeRequest},
};
use crate::shared::{AppError, AppState, MessageResponse};

fn service(state: &AppState) -> ArchetypeService {
    ArchetypeService::new(
        Arc::clone(&state.set_repository),
        Arc::clone(&state.archetype_repository),
        Arc::clone(&state.card_repository),
    )
}

/// GET /api/sets/:id/archetypes
#[instrument(name = "list_archetypes", skip(state))]
pub async fn list_archetypes(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<Vec<ArchetypeResponse>>, AppError> {
    let archetypes = service(&state).list_archetypes(set_id).await?;
    info!(set_id, archetype_count = archetypes.len(), "Archetypes listed");
    Ok(Json(archetypes))
}

/// HTTP handler for creating an archetype in a set
///
/// POST /api/sets/:id/archetypes
#[instrument(name = "create_archetype", skip(state, request))]
pub async fn create_archetype(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Json(request): Json<CreateArchetypeRequest>,
) -> Result<(StatusCode, Json<ArchetypeResponse>), AppError> {
    info!(set_id, name = %request.name, color_pair = %request.color_pair, "Creating archetype");

    let archetype = service(&state).create_archetype(set_id, request).await?;
    Ok((StatusCode::CREATED, Json(archetype)))
}

/// PUT /api/archetypes/:id
#[instrument(name = "update_archetype", skip(state, request))]
pub async fn update_archetype(
    State(state): State<AppState>,
    Path(archetype_id): Path<i64>,
    Json(request): Json<UpdateArchetypeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state)
        .update_archetype(archetype_id, request)
        .await?;
    Ok(Json(MessageResponse::new("Archetype updated successfully")))
}

/// DELETE /api/archetypes/:id
#[instrument(name = "delete_archetype", skip(state))]
pub async fn delete_archetype(
    State(state): State<AppState>,
    Path(archetype_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).delete_archetype(archetype_id).await?;
    Ok(Json(MessageResponse::new("Archetype deleted successfully")))
}
