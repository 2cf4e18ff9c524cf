use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::CardModel;
use crate::archetype::{models::ArchetypeModel, types::ArchetypeSummary};
use crate::distribution::{classify, Bucket, Color, Rarity, SlotPosition};
use crate::shared::double_option;

/// Request payload for creating a card.
/// When `colors` is empty they are derived from `mana_cost`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub power: String,
    #[serde(default)]
    pub toughness: String,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub archetype_id: Option<i64>,
}

/// Partial update; absent fields keep their stored value.
/// `"archetype_id": null` unlinks the card from its archetype.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub name: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub colors: Option<Vec<Color>>,
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "double_option")]
    pub archetype_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResponse {
    pub id: i64,
    pub set_id: i64,
    pub name: String,
    pub mana_cost: String,
    pub type_line: String,
    pub text: String,
    pub power: String,
    pub toughness: String,
    pub colors: Vec<Color>,
    pub rarity: Rarity,
    pub archetype_id: Option<i64>,
    pub archetype: Option<ArchetypeSummary>,
    pub created_at: DateTime<Utc>,
    /// Color/type bucket the card counts toward
    pub bucket: Bucket,
    /// Grid position, when computed against the set's targets
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub slot: Option<SlotPosition>,
}

impl CardResponse {
    pub fn from_model(
        card: &CardModel,
        archetype: Option<&ArchetypeModel>,
        slot: Option<SlotPosition>,
    ) -> Self {
        Self {
            id: card.id,
            set_id: card.set_id,
            name: card.name.clone(),
            mana_cost: card.mana_cost.clone(),
            type_line: card.type_line.clone(),
            text: card.text.clone(),
            power: card.power.clone(),
            toughness: card.toughness.clone(),
            colors: card.colors.clone(),
            rarity: card.rarity,
            archetype_id: card.archetype_id,
            archetype: archetype.map(ArchetypeSummary::from),
            created_at: card.created_at,
            bucket: classify(&card.colors),
            slot,
        }
    }
}
