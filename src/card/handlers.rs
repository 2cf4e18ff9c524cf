use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::CardService,
    types::{CardResponse, CreateCardRequest, UpdateCardRequest},
};
use crate::shared::{AppError, AppState, MessageResponse};

fn service(state: &AppState) -> CardService {
    CardService::new(
        Arc::clone(&state.set_repository),
        Arc::clone(&state.card_repository),
        Arc::clone(&state.archetype_repository),
    )
}

/// HTTP handler for adding a card to a set
///
/// POST /api/sets/:id/cards
/// Returns 201 with the stored card
#[instrument(name = "create_card", skip(state, request))]
pub async fn create_card(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), AppError> {
    info!(set_id, name = %request.name, "Creating new card");

    let card = service(&state).create_card(set_id, request).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/cards/:id
#[instrument(name = "update_card", skip(state, request))]
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).update_card(card_id, request).await?;
    Ok(Json(MessageResponse::new("Card updated successfully")))
}

/// DELETE /api/cards/:id
#[instrument(name = "delete_card", skip(state))]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).delete_card(card_id).await?;
    Ok(Json(MessageResponse::new("Card deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::repository::{CardRepository, InMemoryCardRepository};
    use crate::distribution::{BucketTargets, Color, RarityTargets};
    use crate::set::models::NewSet;
    use crate::set::repository::{InMemorySetRepository, SetRepository};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::ServiceExt; // for `oneshot`

    async fn setup() -> (Router, Arc<InMemoryCardRepository>, i64) {
        let set_repository = Arc::new(InMemorySetRepository::new());
        let card_repository = Arc::new(InMemoryCardRepository::new());
        let set_id = set_repository
            .create_set(&NewSet {
                name: "Handlers".to_string(),
                description: String::new(),
                total_cards: 10,
                bucket_targets: BucketTargets::default(),
                rarity_targets: RarityTargets::default(),
            })
            .await
            .unwrap()
            .id;

        let app_state = AppStateBuilder::new()
            .with_set_repository(set_repository)
            .with_card_repository(card_repository.clone())
            .build();

        let app = Router::new()
            .route("/api/sets/:id/cards", post(create_card))
            .route(
                "/api/cards/:id",
                axum::routing::put(update_card).delete(delete_card),
            )
            .with_state(app_state);

        (app, card_repository, set_id)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_card_handler() {
        let (app, card_repository, set_id) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sets/{}/cards", set_id),
                r#"{"name": "Lightning Helix", "mana_cost": "{R}{W}", "rarity": "uncommon"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let card: CardResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(card.name, "Lightning Helix");
        assert_eq!(card.colors, vec![Color::Red, Color::White]);
        assert_eq!(card.set_id, set_id);
        assert_eq!(card_repository.card_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_card_handler_unknown_set() {
        let (app, _, _) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/sets/999/cards",
                r#"{"name": "Nowhere"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_card_handler_malformed_json() {
        let (app, _, set_id) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sets/{}/cards", set_id),
                r#"{"name": "Broken"#,
            ))
            .await
            .unwrap();

        // Should return 400 Bad Request for malformed JSON
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete_card_handlers() {
        let (app, card_repository, set_id) = setup().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sets/{}/cards", set_id),
                r#"{"name": "Giant Growth", "mana_cost": "{G}"}"#,
            ))
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let card: CardResponse = serde_json::from_slice(&body).unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/cards/{}", card.id),
                r#"{"rarity": "rare"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = card_repository.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.rarity, crate::distribution::Rarity::Rare);
        assert_eq!(stored.colors, vec![Color::Green]);

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/cards/{}", card.id),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(card_repository.card_count().await, 0);

        let response = app
            .oneshot(json_request(
                "DELETE",
                &format!("/api/cards/{}", card.id),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
