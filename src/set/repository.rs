use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewSet, SetModel};
use crate::db::{count_from_db, count_to_db};
use crate::distribution::{BucketTargets, RarityTargets};
use crate::shared::AppError;

/// Trait for set repository operations
#[async_trait]
pub trait SetRepository {
    async fn create_set(&self, set: &NewSet) -> Result<SetModel, AppError>;
    async fn get_set(&self, set_id: i64) -> Result<Option<SetModel>, AppError>;
    /// All sets, oldest first
    async fn list_sets(&self) -> Result<Vec<SetModel>, AppError>;
    async fn update_set(&self, set: &SetModel) -> Result<(), AppError>;
    async fn delete_set(&self, set_id: i64) -> Result<(), AppError>;
}

/// In-memory implementation of SetRepository for development and testing
pub struct InMemorySetRepository {
    sets: RwLock<HashMap<i64, SetModel>>,
    next_id: AtomicI64,
}

impl Default for InMemorySetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySetRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn set_count(&self) -> usize {
        self.sets.read().await.len()
    }
}

#[async_trait]
impl SetRepository for InMemorySetRepository {
    #[instrument(skip(self, set))]
    async fn create_set(&self, set: &NewSet) -> Result<SetModel, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(set_id = id, name = %set.name, "Creating set in memory");

        let model = set.clone().into_model(id, Utc::now());
        self.sets.write().await.insert(id, model.clone());

        debug!(set_id = id, "Set created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_set(&self, set_id: i64) -> Result<Option<SetModel>, AppError> {
        debug!(set_id, "Fetching set from memory");

        let set = self.sets.read().await.get(&set_id).cloned();
        if set.is_none() {
            debug!(set_id, "Set not found in memory");
        }

        Ok(set)
    }

    #[instrument(skip(self))]
    async fn list_sets(&self) -> Result<Vec<SetModel>, AppError> {
        debug!("Listing all sets in memory");

        let mut sets: Vec<SetModel> = self.sets.read().await.values().cloned().collect();
        sets.sort_by_key(|s| s.id);

        Ok(sets)
    }

    #[instrument(skip(self, set))]
    async fn update_set(&self, set: &SetModel) -> Result<(), AppError> {
        debug!(set_id = set.id, "Updating set in memory");

        let mut sets = self.sets.write().await;
        match sets.get_mut(&set.id) {
            Some(existing) => {
                *existing = set.clone();
                Ok(())
            }
            None => {
                warn!(set_id = set.id, "Set not found for update in memory");
                Err(AppError::NotFound("Set not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_set(&self, set_id: i64) -> Result<(), AppError> {
        debug!(set_id, "Deleting set from memory");

        if self.sets.write().await.remove(&set_id).is_none() {
            warn!(set_id, "Set not found for deletion in memory");
            return Err(AppError::NotFound("Set not found".to_string()));
        }

        Ok(())
    }
}

/// PostgreSQL implementation of set repository
pub struct PostgresSetRepository {
    pool: PgPool,
}

impl PostgresSetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SET_COLUMNS: &str = "id, name, description, created_at, updated_at, total_cards, \
    white_cards, blue_cards, black_cards, red_cards, green_cards, colorless_cards, \
    multicolor_cards, lands_cards, basic_lands_cards, \
    common_cards, uncommon_cards, rare_cards, mythic_cards";

fn count(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    Ok(count_from_db(row.try_get::<i32, _>(column)?))
}

fn set_from_row(row: &PgRow) -> Result<SetModel, sqlx::Error> {
    Ok(SetModel {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        total_cards: count(row, "total_cards")?,
        bucket_targets: BucketTargets {
            white_cards: count(row, "white_cards")?,
            blue_cards: count(row, "blue_cards")?,
            black_cards: count(row, "black_cards")?,
            red_cards: count(row, "red_cards")?,
            green_cards: count(row, "green_cards")?,
            colorless_cards: count(row, "colorless_cards")?,
            multicolor_cards: count(row, "multicolor_cards")?,
            lands_cards: count(row, "lands_cards")?,
            basic_lands_cards: count(row, "basic_lands_cards")?,
        },
        rarity_targets: RarityTargets {
            common_cards: count(row, "common_cards")?,
            uncommon_cards: count(row, "uncommon_cards")?,
            rare_cards: count(row, "rare_cards")?,
            mythic_cards: count(row, "mythic_cards")?,
        },
    })
}

#[async_trait]
impl SetRepository for PostgresSetRepository {
    #[instrument(skip(self, set))]
    async fn create_set(&self, set: &NewSet) -> Result<SetModel, AppError> {
        debug!(name = %set.name, "Creating set in database");

        let b = &set.bucket_targets;
        let r = &set.rarity_targets;
        let query = format!(
            "INSERT INTO custom_sets (name, description, total_cards, \
             white_cards, blue_cards, black_cards, red_cards, green_cards, colorless_cards, \
             multicolor_cards, lands_cards, basic_lands_cards, \
             common_cards, uncommon_cards, rare_cards, mythic_cards) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {}",
            SET_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&set.name)
            .bind(&set.description)
            .bind(count_to_db(set.total_cards))
            .bind(count_to_db(b.white_cards))
            .bind(count_to_db(b.blue_cards))
            .bind(count_to_db(b.black_cards))
            .bind(count_to_db(b.red_cards))
            .bind(count_to_db(b.green_cards))
            .bind(count_to_db(b.colorless_cards))
            .bind(count_to_db(b.multicolor_cards))
            .bind(count_to_db(b.lands_cards))
            .bind(count_to_db(b.basic_lands_cards))
            .bind(count_to_db(r.common_cards))
            .bind(count_to_db(r.uncommon_cards))
            .bind(count_to_db(r.rare_cards))
            .bind(count_to_db(r.mythic_cards))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create set in database");
                AppError::DatabaseError(e.to_string())
            })?;

        let model = set_from_row(&row)?;
        debug!(set_id = model.id, "Set created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_set(&self, set_id: i64) -> Result<Option<SetModel>, AppError> {
        debug!(set_id, "Fetching set from database");

        let query = format!("SELECT {} FROM custom_sets WHERE id = $1", SET_COLUMNS);
        let row = sqlx::query(&query)
            .bind(set_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to fetch set from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.as_ref().map(set_from_row).transpose()?)
    }

    #[instrument(skip(self))]
    async fn list_sets(&self) -> Result<Vec<SetModel>, AppError> {
        debug!("Listing sets from database");

        let query = format!("SELECT {} FROM custom_sets ORDER BY id", SET_COLUMNS);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list sets from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(rows
            .iter()
            .map(set_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self, set))]
    async fn update_set(&self, set: &SetModel) -> Result<(), AppError> {
        debug!(set_id = set.id, "Updating set in database");

        let b = &set.bucket_targets;
        let r = &set.rarity_targets;
        let result = sqlx::query(
            "UPDATE custom_sets SET name = $2, description = $3, updated_at = $4, total_cards = $5, \
             white_cards = $6, blue_cards = $7, black_cards = $8, red_cards = $9, green_cards = $10, \
             colorless_cards = $11, multicolor_cards = $12, lands_cards = $13, basic_lands_cards = $14, \
             common_cards = $15, uncommon_cards = $16, rare_cards = $17, mythic_cards = $18 \
             WHERE id = $1",
        )
        .bind(set.id)
        .bind(&set.name)
        .bind(&set.description)
        .bind(set.updated_at)
        .bind(count_to_db(set.total_cards))
        .bind(count_to_db(b.white_cards))
        .bind(count_to_db(b.blue_cards))
        .bind(count_to_db(b.black_cards))
        .bind(count_to_db(b.red_cards))
        .bind(count_to_db(b.green_cards))
        .bind(count_to_db(b.colorless_cards))
        .bind(count_to_db(b.multicolor_cards))
        .bind(count_to_db(b.lands_cards))
        .bind(count_to_db(b.basic_lands_cards))
        .bind(count_to_db(r.common_cards))
        .bind(count_to_db(r.uncommon_cards))
        .bind(count_to_db(r.rare_cards))
        .bind(count_to_db(r.mythic_cards))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, set_id = set.id, "Failed to update set in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(set_id = set.id, "Set not found for update");
            return Err(AppError::NotFound("Set not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_set(&self, set_id: i64) -> Result<(), AppError> {
        debug!(set_id, "Deleting set from database");

        // cards and archetypes go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM custom_sets WHERE id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to delete set from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(set_id, "Set not found for deletion");
            return Err(AppError::NotFound("Set not found".to_string()));
        }

        Ok(())
    }
}
