use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::ArchetypeModel;
use crate::distribution::Color;

/// Request payload for creating an archetype
#[derive(Debug, Deserialize)]
pub struct CreateArchetypeRequest {
    pub name: String,
    /// Display title; falls back to the name when omitted
    #[serde(default)]
    pub title: Option<String>,
    pub color_pair: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArchetypeRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub color_pair: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeResponse {
    pub id: i64,
    pub set_id: i64,
    pub name: String,
    pub title: String,
    pub color_pair: String,
    pub colors: Vec<Color>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ArchetypeModel> for ArchetypeResponse {
    fn from(model: ArchetypeModel) -> Self {
        let colors = model.colors();
        Self {
            id: model.id,
            set_id: model.set_id,
            name: model.name,
            title: model.title,
            color_pair: model.color_pair,
            colors,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// Short form embedded in card responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSummary {
    pub id: i64,
    pub name: String,
    pub color_pair: String,
}

impl From<&ArchetypeModel> for ArchetypeSummary {
    fn from(model: &ArchetypeModel) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            color_pair: model.color_pair.clone(),
        }
    }
}
