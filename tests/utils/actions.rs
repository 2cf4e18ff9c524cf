//! Request helpers that drive the router the way a client would
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestApp;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestApp {
    /// Send a request and return the status with the parsed JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Create a set and return its id
    pub async fn create_set(&self, body: Value) -> i64 {
        let (status, set) = self.post("/api/sets", body).await;
        assert_eq!(status, StatusCode::CREATED, "create set failed: {}", set);
        set["id"].as_i64().unwrap()
    }

    /// Add a card with just a name and mana cost; returns the card id
    pub async fn add_card(&self, set_id: i64, name: &str, mana_cost: &str) -> i64 {
        self.add_card_with(set_id, json!({ "name": name, "mana_cost": mana_cost }))
            .await
    }

    pub async fn add_card_with(&self, set_id: i64, body: Value) -> i64 {
        let (status, card) = self
            .post(&format!("/api/sets/{}/cards", set_id), body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "create card failed: {}", card);
        card["id"].as_i64().unwrap()
    }

    pub async fn create_archetype(&self, set_id: i64, name: &str, color_pair: &str) -> i64 {
        let (status, archetype) = self
            .post(
                &format!("/api/sets/{}/archetypes", set_id),
                json!({ "name": name, "color_pair": color_pair }),
            )
            .await;
        assert_eq!(
            status,
            StatusCode::CREATED,
            "create archetype failed: {}",
            archetype
        );
        archetype["id"].as_i64().unwrap()
    }

    pub async fn grid(&self, set_id: i64, query: &str) -> Value {
        let (status, grid) = self
            .get(&format!("/api/sets/{}/grid{}", set_id, query))
            .await;
        assert_eq!(status, StatusCode::OK, "grid failed: {}", grid);
        grid
    }

    pub async fn crunch(&self, set_id: i64) -> Value {
        let (status, crunch) = self
            .get(&format!("/api/sets/{}/number-crunch", set_id))
            .await;
        assert_eq!(status, StatusCode::OK, "number crunch failed: {}", crunch);
        crunch
    }
}
