use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{archetype, card, set, shared::AppState};

/// Route table for the whole API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/sets", get(set::list_sets).post(set::create_set))
        .route(
            "/api/sets/:id",
            get(set::get_set).put(set::update_set).delete(set::delete_set),
        )
        .route("/api/sets/:id/number-crunch", get(set::number_crunch))
        .route("/api/sets/:id/grid", get(set::get_grid))
        .route("/api/sets/:id/cards", post(card::create_card))
        .route(
            "/api/cards/:id",
            put(card::update_card).delete(card::delete_card),
        )
        .route(
            "/api/sets/:id/archetypes",
            get(archetype::list_archetypes).post(archetype::create_archetype),
        )
        .route(
            "/api/archetypes/:id",
            put(archetype::update_archetype).delete(archetype::delete_archetype),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
