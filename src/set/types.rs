use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::models::SetModel;
use crate::archetype::types::ArchetypeResponse;
use crate::card::types::CardResponse;
use crate::distribution::{
    Bucket, BucketTargets, CardFilter, Color, CrunchReport, Rarity, RarityTargets, SortDirection,
    SortKey, TargetWarning, ViewConfig,
};
use crate::shared::AppError;

/// Request payload for creating a set.
/// Target fields sit at the top level of the body, e.g. `"white_cards": 20`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSetRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_cards: u32,
    #[serde(flatten)]
    pub bucket_targets: BucketTargets,
    #[serde(flatten)]
    pub rarity_targets: RarityTargets,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub total_cards: Option<u32>,
    pub white_cards: Option<u32>,
    pub blue_cards: Option<u32>,
    pub black_cards: Option<u32>,
    pub red_cards: Option<u32>,
    pub green_cards: Option<u32>,
    pub colorless_cards: Option<u32>,
    pub multicolor_cards: Option<u32>,
    pub lands_cards: Option<u32>,
    pub basic_lands_cards: Option<u32>,
    pub common_cards: Option<u32>,
    pub uncommon_cards: Option<u32>,
    pub rare_cards: Option<u32>,
    pub mythic_cards: Option<u32>,
}

impl UpdateSetRequest {
    /// Bucket targets present in the request
    pub fn bucket_updates(&self) -> Vec<(Bucket, u32)> {
        [
            (Bucket::White, self.white_cards),
            (Bucket::Blue, self.blue_cards),
            (Bucket::Black, self.black_cards),
            (Bucket::Red, self.red_cards),
            (Bucket::Green, self.green_cards),
            (Bucket::Colorless, self.colorless_cards),
            (Bucket::Multicolor, self.multicolor_cards),
            (Bucket::Lands, self.lands_cards),
            (Bucket::BasicLands, self.basic_lands_cards),
        ]
        .into_iter()
        .filter_map(|(bucket, value)| value.map(|v| (bucket, v)))
        .collect()
    }

    pub fn apply_rarity_targets(&self, targets: &mut RarityTargets) {
        if let Some(value) = self.common_cards {
            targets.common_cards = value;
        }
        if let Some(value) = self.uncommon_cards {
            targets.uncommon_cards = value;
        }
        if let Some(value) = self.rare_cards {
            targets.rare_cards = value;
        }
        if let Some(value) = self.mythic_cards {
            targets.mythic_cards = value;
        }
    }
}

/// A target mismatch with its human readable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningResponse {
    #[serde(flatten)]
    pub warning: TargetWarning,
    pub message: String,
}

impl From<TargetWarning> for WarningResponse {
    fn from(warning: TargetWarning) -> Self {
        Self {
            message: warning.to_string(),
            warning,
        }
    }
}

/// Set as listed on the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummaryResponse {
    #[serde(flatten)]
    pub set: SetModel,
    pub card_count: u32,
    pub completion_percent: u32,
}

/// Full set view: targets, archetypes and cards with their grid positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDetailResponse {
    #[serde(flatten)]
    pub set: SetModel,
    pub card_count: u32,
    pub completion_percent: u32,
    pub remaining: u32,
    pub warnings: Vec<WarningResponse>,
    pub archetypes: Vec<ArchetypeResponse>,
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberCrunchResponse {
    pub set_id: i64,
    pub set_name: String,
    #[serde(flatten)]
    pub report: CrunchReport,
    pub warning_messages: Vec<String>,
}

/// Query string of the grid endpoint, e.g.
/// `?colors=red,green&sort=name&direction=desc`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridQuery {
    pub name: Option<String>,
    pub type_line: Option<String>,
    pub rarity: Option<String>,
    pub archetype_id: Option<i64>,
    /// Comma-separated color names
    pub colors: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

fn parse_param<T: FromStr>(raw: &Option<String>, what: &str) -> Result<Option<T>, AppError> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown {} '{}'", what, value))),
    }
}

impl TryFrom<GridQuery> for ViewConfig {
    type Error = AppError;

    fn try_from(query: GridQuery) -> Result<Self, Self::Error> {
        let mut colors: Vec<Color> = Vec::new();
        for part in query.colors.as_deref().unwrap_or_default().split(',') {
            if let Some(color) = parse_param::<Color>(&Some(part.to_string()), "color")? {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }

        Ok(ViewConfig {
            filter: CardFilter {
                name: query.name,
                type_line: query.type_line,
                rarity: parse_param::<Rarity>(&query.rarity, "rarity")?,
                archetype_id: query.archetype_id,
                colors,
            },
            sort: parse_param::<SortKey>(&query.sort, "sort key")?.unwrap_or_default(),
            direction: parse_param::<SortDirection>(&query.direction, "sort direction")?
                .unwrap_or_default(),
        })
    }
}

/// One grid cell on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridEntryResponse {
    Card {
        position: u32,
        card: CardResponse,
    },
    Empty {
        position: u32,
        expected_bucket: Bucket,
    },
}

impl GridEntryResponse {
    pub fn position(&self) -> u32 {
        match self {
            GridEntryResponse::Card { position, .. } | GridEntryResponse::Empty { position, .. } => {
                *position
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResponse {
    pub set_id: i64,
    pub total_cards: u32,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub filtered: bool,
    pub entries: Vec<GridEntryResponse>,
    pub overflow: Vec<GridEntryResponse>,
}
