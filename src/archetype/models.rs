use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distribution::Color;
use crate::shared::AppError;

/// Stored record for a two- or three-color archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeModel {
    pub id: i64,
    pub set_id: i64,
    pub name: String,
    pub title: String,
    /// Upper-case color code such as "WU" or "BRG"
    pub color_pair: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl ArchetypeModel {
    pub fn colors(&self) -> Vec<Color> {
        self.color_pair.chars().filter_map(Color::from_symbol).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArchetype {
    pub set_id: i64,
    pub name: String,
    pub title: String,
    pub color_pair: String,
    pub description: String,
}

impl NewArchetype {
    pub fn into_model(self, id: i64, created_at: DateTime<Utc>) -> ArchetypeModel {
        ArchetypeModel {
            id,
            set_id: self.set_id,
            name: self.name,
            title: self.title,
            color_pair: self.color_pair,
            description: self.description,
            created_at,
        }
    }
}

/// Validates a color code: two or three distinct letters out of WUBRG.
/// Returns the upper-cased code.
pub fn normalize_color_pair(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_ascii_uppercase();

    let mut seen: Vec<Color> = Vec::with_capacity(3);
    for symbol in code.chars() {
        let color = Color::from_symbol(symbol).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown color symbol '{}' in '{}'", symbol, raw))
        })?;
        if seen.contains(&color) {
            return Err(AppError::BadRequest(format!(
                "Color '{}' repeated in '{}'",
                symbol, raw
            )));
        }
        seen.push(color);
    }

    if !(2..=3).contains(&seen.len()) {
        return Err(AppError::BadRequest(
            "Archetype color code must have two or three colors".to_string(),
        ));
    }

    Ok(code)
}
