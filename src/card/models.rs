use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distribution::{AccountedCard, Color, Rarity};

/// Stored record for a card in a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardModel {
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
    pub created_at: DateTime<Utc>,
}

/// Card fields as submitted; id and timestamp come from the repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
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
}

impl NewCard {
    pub fn into_model(self, id: i64, created_at: DateTime<Utc>) -> CardModel {
        CardModel {
            id,
            set_id: self.set_id,
            name: self.name,
            mana_cost: self.mana_cost,
            type_line: self.type_line,
            text: self.text,
            power: self.power,
            toughness: self.toughness,
            colors: self.colors,
            rarity: self.rarity,
            archetype_id: self.archetype_id,
            created_at,
        }
    }
}

/// Drops repeated colors, keeping first occurrences in order
pub fn dedup_colors(colors: Vec<Color>) -> Vec<Color> {
    let mut distinct = Vec::with_capacity(colors.len());
    for color in colors {
        if !distinct.contains(&color) {
            distinct.push(color);
        }
    }
    distinct
}

impl AccountedCard for CardModel {
    fn id(&self) -> i64 {
        self.id
    }

    fn colors(&self) -> &[Color] {
        &self.colors
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_line(&self) -> &str {
        &self.type_line
    }

    fn mana_cost(&self) -> &str {
        &self.mana_cost
    }

    fn archetype_id(&self) -> Option<i64> {
        self.archetype_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
