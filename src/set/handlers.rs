use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::SetModel,
    service::SetService,
    types::{
        CreateSetRequest, GridQuery, GridResponse, NumberCrunchResponse, SetDetailResponse,
        SetSummaryResponse, UpdateSetRequest,
    },
};
use crate::distribution::ViewConfig;
use crate::shared::{AppError, AppState, MessageResponse};

fn service(state: &AppState) -> SetService {
    SetService::new(
        Arc::clone(&state.set_repository),
        Arc::clone(&state.card_repository),
        Arc::clone(&state.archetype_repository),
    )
}

/// HTTP handler for listing all sets
///
/// GET /api/sets
#[instrument(name = "list_sets", skip(state))]
pub async fn list_sets(
    State(state): State<AppState>,
) -> Result<Json<Vec<SetSummaryResponse>>, AppError> {
    let sets = service(&state).list_sets().await?;
    info!(set_count = sets.len(), "Sets listed successfully");
    Ok(Json(sets))
}

/// HTTP handler for creating a set
///
/// POST /api/sets
/// Returns 201 with the stored set
#[instrument(name = "create_set", skip(state, request))]
pub async fn create_set(
    State(state): State<AppState>,
    Json(request): Json<CreateSetRequest>,
) -> Result<(StatusCode, Json<SetModel>), AppError> {
    info!(name = %request.name, total_cards = request.total_cards, "Creating new set");

    let set = service(&state).create_set(request).await?;
    Ok((StatusCode::CREATED, Json(set)))
}

/// HTTP handler for a set with its archetypes and cards
///
/// GET /api/sets/:id
#[instrument(name = "get_set", skip(state))]
pub async fn get_set(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<SetDetailResponse>, AppError> {
    let details = service(&state).get_set_details(set_id).await?;
    Ok(Json(details))
}

/// PUT /api/sets/:id
#[instrument(name = "update_set", skip(state, request))]
pub async fn update_set(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Json(request): Json<UpdateSetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).update_set(set_id, request).await?;
    Ok(Json(MessageResponse::new("Set updated successfully")))
}

/// DELETE /api/sets/:id
#[instrument(name = "delete_set", skip(state))]
pub async fn delete_set(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).delete_set(set_id).await?;
    Ok(Json(MessageResponse::new("Set deleted successfully")))
}

/// HTTP handler for the completion/deficit report
///
/// GET /api/sets/:id/number-crunch
#[instrument(name = "number_crunch", skip(state))]
pub async fn number_crunch(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<NumberCrunchResponse>, AppError> {
    let crunch = service(&state).number_crunch(set_id).await?;
    info!(
        set_id,
        completion_percent = crunch.report.completion_percent,
        "Number crunch served"
    );
    Ok(Json(crunch))
}

/// HTTP handler for the card grid
///
/// GET /api/sets/:id/grid?name=&type_line=&rarity=&archetype_id=&colors=&sort=&direction=
#[instrument(name = "set_grid", skip(state))]
pub async fn get_grid(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Query(query): Query<GridQuery>,
) -> Result<Json<GridResponse>, AppError> {
    let view = ViewConfig::try_from(query)?;
    let grid = service(&state).grid(set_id, view).await?;
    Ok(Json(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::repository::InMemorySetRepository;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/api/sets", get(list_sets).post(create_set))
            .route("/api/sets/:id", get(get_set).put(update_set).delete(delete_set))
            .route("/api/sets/:id/number-crunch", get(number_crunch))
            .route("/api/sets/:id/grid", get(get_grid))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_set_handler() {
        let set_repository = Arc::new(InMemorySetRepository::new());
        let app_state = AppStateBuilder::new()
            .with_set_repository(set_repository.clone())
            .build();

        let response = app(app_state)
            .oneshot(json_request(
                "POST",
                "/api/sets",
                r#"{"name": "Innistrad", "total_cards": 20, "black_cards": 20}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let set: SetModel = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(set.name, "Innistrad");
        assert_eq!(set.bucket_targets.black_cards, 20);
        assert_eq!(set_repository.set_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_set_handler_missing_name() {
        let app_state = AppStateBuilder::new().build();

        let response = app(app_state)
            .oneshot(json_request("POST", "/api/sets", r#"{"total_cards": 5}"#))
            .await
            .unwrap();

        // Should return 422 Unprocessable Entity for invalid JSON structure
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_set_handler_blank_name() {
        let app_state = AppStateBuilder::new().build();

        let response = app(app_state)
            .oneshot(json_request("POST", "/api/sets", r#"{"name": "  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Set name is required");
    }

    #[tokio::test]
    async fn test_get_missing_set_handler() {
        let app_state = AppStateBuilder::new().build();

        let response = app(app_state)
            .oneshot(get_request("/api/sets/12"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Set 12 not found");
    }

    #[tokio::test]
    async fn test_update_and_delete_set_handlers() {
        let app_state = AppStateBuilder::new().build();
        let router = app(app_state);

        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/sets", r#"{"name": "Draft"}"#))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/sets/{}", id),
                r#"{"total_cards": 15}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Set updated successfully"
        );

        let response = router
            .clone()
            .oneshot(get_request(&format!("/api/sets/{}", id)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total_cards"], 15);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/sets/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get_request("/api/sets")).await.unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_grid_handler_rejects_unknown_sort() {
        let app_state = AppStateBuilder::new().build();
        let router = app(app_state);

        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/sets", r#"{"name": "Grid"}"#))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = router
            .oneshot(get_request(&format!("/api/sets/{}/grid?sort=power", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_number_crunch_handler_empty_set() {
        let app_state = AppStateBuilder::new().build();
        let router = app(app_state);

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/sets",
                r#"{"name": "Empty", "total_cards": 0}"#,
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = router
            .oneshot(get_request(&format!("/api/sets/{}/number-crunch", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["completion_percent"], 0);
        assert_eq!(body["remaining"], 0);
        assert_eq!(
            body["recommendations"],
            serde_json::json!(["Color distribution is perfectly balanced!"])
        );
    }
}
