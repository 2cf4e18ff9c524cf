use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{CardModel, NewCard};
use crate::distribution::{Color, Rarity};
use crate::shared::AppError;

/// Trait for card repository operations
#[async_trait]
pub trait CardRepository {
    async fn create_card(&self, card: &NewCard) -> Result<CardModel, AppError>;
    async fn get_card(&self, card_id: i64) -> Result<Option<CardModel>, AppError>;
    /// Cards of one set in creation (id) order
    async fn list_cards_for_set(&self, set_id: i64) -> Result<Vec<CardModel>, AppError>;
    async fn count_cards_for_set(&self, set_id: i64) -> Result<u32, AppError>;
    async fn update_card(&self, card: &CardModel) -> Result<(), AppError>;
    async fn delete_card(&self, card_id: i64) -> Result<(), AppError>;
    /// Removes every card of a set, returning how many went
    async fn delete_cards_for_set(&self, set_id: i64) -> Result<u64, AppError>;
    /// Unlinks cards from an archetype that is going away
    async fn clear_archetype(&self, archetype_id: i64) -> Result<u64, AppError>;
}

/// In-memory implementation of CardRepository for development and testing
pub struct InMemoryCardRepository {
    cards: RwLock<HashMap<i64, CardModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryCardRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn card_count(&self) -> usize {
        self.cards.read().await.len()
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    #[instrument(skip(self, card))]
    async fn create_card(&self, card: &NewCard) -> Result<CardModel, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(card_id = id, set_id = card.set_id, name = %card.name, "Creating card in memory");

        let model = card.clone().into_model(id, Utc::now());
        self.cards.write().await.insert(id, model.clone());

        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_card(&self, card_id: i64) -> Result<Option<CardModel>, AppError> {
        debug!(card_id, "Fetching card from memory");
        Ok(self.cards.read().await.get(&card_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_cards_for_set(&self, set_id: i64) -> Result<Vec<CardModel>, AppError> {
        debug!(set_id, "Listing cards for set in memory");

        let mut cards: Vec<CardModel> = self
            .cards
            .read()
            .await
            .values()
            .filter(|c| c.set_id == set_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.id);

        Ok(cards)
    }

    #[instrument(skip(self))]
    async fn count_cards_for_set(&self, set_id: i64) -> Result<u32, AppError> {
        let count = self
            .cards
            .read()
            .await
            .values()
            .filter(|c| c.set_id == set_id)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    #[instrument(skip(self, card))]
    async fn update_card(&self, card: &CardModel) -> Result<(), AppError> {
        debug!(card_id = card.id, "Updating card in memory");

        let mut cards = self.cards.write().await;
        match cards.get_mut(&card.id) {
            Some(existing) => {
                *existing = card.clone();
                Ok(())
            }
            None => {
                warn!(card_id = card.id, "Card not found for update in memory");
                Err(AppError::NotFound("Card not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_card(&self, card_id: i64) -> Result<(), AppError> {
        debug!(card_id, "Deleting card from memory");

        if self.cards.write().await.remove(&card_id).is_none() {
            warn!(card_id, "Card not found for deletion in memory");
            return Err(AppError::NotFound("Card not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_cards_for_set(&self, set_id: i64) -> Result<u64, AppError> {
        let mut cards = self.cards.write().await;
        let before = cards.len();
        cards.retain(|_, c| c.set_id != set_id);
        let removed = (before - cards.len()) as u64;

        debug!(set_id, removed, "Deleted cards for set in memory");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear_archetype(&self, archetype_id: i64) -> Result<u64, AppError> {
        let mut cleared = 0;
        for card in self.cards.write().await.values_mut() {
            if card.archetype_id == Some(archetype_id) {
                card.archetype_id = None;
                cleared += 1;
            }
        }

        debug!(archetype_id, cleared, "Cleared archetype from cards in memory");
        Ok(cleared)
    }
}

/// PostgreSQL implementation of card repository
pub struct PostgresCardRepository {
    pool: PgPool,
}

impl PostgresCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CARD_COLUMNS: &str = "id, set_id, name, mana_cost, type_line, text, power, toughness, \
    colors, rarity, archetype_id, created_at";

fn card_from_row(row: &PgRow) -> Result<CardModel, AppError> {
    let raw_colors: Vec<String> = row.try_get("colors")?;
    let colors = raw_colors
        .iter()
        .map(|c| Color::from_str(c))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::DatabaseError(format!("Bad stored color: {}", e)))?;

    let raw_rarity: String = row.try_get("rarity")?;
    let rarity = Rarity::from_str(&raw_rarity)
        .map_err(|_| AppError::DatabaseError(format!("Bad stored rarity: {}", raw_rarity)))?;

    Ok(CardModel {
        id: row.try_get("id")?,
        set_id: row.try_get("set_id")?,
        name: row.try_get("name")?,
        mana_cost: row.try_get("mana_cost")?,
        type_line: row.try_get("type_line")?,
        text: row.try_get("text")?,
        power: row.try_get("power")?,
        toughness: row.try_get("toughness")?,
        colors,
        rarity,
        archetype_id: row.try_get("archetype_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn colors_to_db(colors: &[Color]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

#[async_trait]
impl CardRepository for PostgresCardRepository {
    #[instrument(skip(self, card))]
    async fn create_card(&self, card: &NewCard) -> Result<CardModel, AppError> {
        debug!(set_id = card.set_id, name = %card.name, "Creating card in database");

        let query = format!(
            "INSERT INTO cards (set_id, name, mana_cost, type_line, text, power, toughness, \
             colors, rarity, archetype_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            CARD_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(card.set_id)
            .bind(&card.name)
            .bind(&card.mana_cost)
            .bind(&card.type_line)
            .bind(&card.text)
            .bind(&card.power)
            .bind(&card.toughness)
            .bind(colors_to_db(&card.colors))
            .bind(card.rarity.to_string())
            .bind(card.archetype_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create card in database");
                AppError::DatabaseError(e.to_string())
            })?;

        card_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_card(&self, card_id: i64) -> Result<Option<CardModel>, AppError> {
        debug!(card_id, "Fetching card from database");

        let query = format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS);
        let row = sqlx::query(&query)
            .bind(card_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, card_id, "Failed to fetch card from database");
                AppError::DatabaseError(e.to_string())
            })?;

        row.as_ref().map(card_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_cards_for_set(&self, set_id: i64) -> Result<Vec<CardModel>, AppError> {
        debug!(set_id, "Listing cards for set from database");

        let query = format!(
            "SELECT {} FROM cards WHERE set_id = $1 ORDER BY id",
            CARD_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(set_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to list cards from database");
                AppError::DatabaseError(e.to_string())
            })?;

        rows.iter().map(card_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn count_cards_for_set(&self, set_id: i64) -> Result<u32, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE set_id = $1")
            .bind(set_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to count cards in database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    #[instrument(skip(self, card))]
    async fn update_card(&self, card: &CardModel) -> Result<(), AppError> {
        debug!(card_id = card.id, "Updating card in database");

        let result = sqlx::query(
            "UPDATE cards SET name = $2, mana_cost = $3, type_line = $4, text = $5, power = $6, \
             toughness = $7, colors = $8, rarity = $9, archetype_id = $10 WHERE id = $1",
        )
        .bind(card.id)
        .bind(&card.name)
        .bind(&card.mana_cost)
        .bind(&card.type_line)
        .bind(&card.text)
        .bind(&card.power)
        .bind(&card.toughness)
        .bind(colors_to_db(&card.colors))
        .bind(card.rarity.to_string())
        .bind(card.archetype_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, card_id = card.id, "Failed to update card in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(card_id = card.id, "Card not found for update");
            return Err(AppError::NotFound("Card not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_card(&self, card_id: i64) -> Result<(), AppError> {
        debug!(card_id, "Deleting card from database");

        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, card_id, "Failed to delete card from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(card_id, "Card not found for deletion");
            return Err(AppError::NotFound("Card not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_cards_for_set(&self, set_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM cards WHERE set_id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to delete cards for set");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn clear_archetype(&self, archetype_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE cards SET archetype_id = NULL WHERE archetype_id = $1")
            .bind(archetype_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, archetype_id, "Failed to clear archetype from cards");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
