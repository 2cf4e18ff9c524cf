use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{ArchetypeModel, NewArchetype};
use crate::shared::AppError;

/// Trait for archetype repository operations
#[async_trait]
pub trait ArchetypeRepository {
    async fn create_archetype(&self, archetype: &NewArchetype)
        -> Result<ArchetypeModel, AppError>;
    async fn get_archetype(&self, archetype_id: i64) -> Result<Option<ArchetypeModel>, AppError>;
    async fn list_archetypes_for_set(&self, set_id: i64) -> Result<Vec<ArchetypeModel>, AppError>;
    async fn update_archetype(&self, archetype: &ArchetypeModel) -> Result<(), AppError>;
    async fn delete_archetype(&self, archetype_id: i64) -> Result<(), AppError>;
    async fn delete_archetypes_for_set(&self, set_id: i64) -> Result<u64, AppError>;
}

/// In-memory implementation of ArchetypeRepository for development and testing
pub struct InMemoryArchetypeRepository {
    archetypes: RwLock<HashMap<i64, ArchetypeModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryArchetypeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryArchetypeRepository {
    pub fn new() -> Self {
        Self {
            archetypes: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ArchetypeRepository for InMemoryArchetypeRepository {
    #[instrument(skip(self, archetype))]
    async fn create_archetype(
        &self,
        archetype: &NewArchetype,
    ) -> Result<ArchetypeModel, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(archetype_id = id, set_id = archetype.set_id, "Creating archetype in memory");

        let model = archetype.clone().into_model(id, Utc::now());
        self.archetypes.write().await.insert(id, model.clone());

        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_archetype(&self, archetype_id: i64) -> Result<Option<ArchetypeModel>, AppError> {
        Ok(self.archetypes.read().await.get(&archetype_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_archetypes_for_set(&self, set_id: i64) -> Result<Vec<ArchetypeModel>, AppError> {
        let mut archetypes: Vec<ArchetypeModel> = self
            .archetypes
            .read()
            .await
            .values()
            .filter(|a| a.set_id == set_id)
            .cloned()
            .collect();
        archetypes.sort_by_key(|a| a.id);

        Ok(archetypes)
    }

    #[instrument(skip(self, archetype))]
    async fn update_archetype(&self, archetype: &ArchetypeModel) -> Result<(), AppError> {
        let mut archetypes = self.archetypes.write().await;
        match archetypes.get_mut(&archetype.id) {
            Some(existing) => {
                *existing = archetype.clone();
                Ok(())
            }
            None => {
                warn!(archetype_id = archetype.id, "Archetype not found for update in memory");
                Err(AppError::NotFound("Archetype not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_archetype(&self, archetype_id: i64) -> Result<(), AppError> {
        if self.archetypes.write().await.remove(&archetype_id).is_none() {
            warn!(archetype_id, "Archetype not found for deletion in memory");
            return Err(AppError::NotFound("Archetype not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_archetypes_for_set(&self, set_id: i64) -> Result<u64, AppError> {
        let mut archetypes = self.archetypes.write().await;
        let before = archetypes.len();
        archetypes.retain(|_, a| a.set_id != set_id);
        Ok((before - archetypes.len()) as u64)
    }
}

/// PostgreSQL implementation of archetype repository
pub struct PostgresArchetypeRepository {
    pool: PgPool,
}

impl PostgresArchetypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn archetype_from_row(row: &PgRow) -> Result<ArchetypeModel, sqlx::Error> {
    Ok(ArchetypeModel {
        id: row.try_get("id")?,
        set_id: row.try_get("set_id")?,
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        color_pair: row.try_get("color_pair")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ArchetypeRepository for PostgresArchetypeRepository {
    #[instrument(skip(self, archetype))]
    async fn create_archetype(
        &self,
        archetype: &NewArchetype,
    ) -> Result<ArchetypeModel, AppError> {
        debug!(set_id = archetype.set_id, "Creating archetype in database");

        let row = sqlx::query(
            "INSERT INTO archetypes (set_id, name, title, color_pair, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, set_id, name, title, color_pair, description, created_at",
        )
        .bind(archetype.set_id)
        .bind(&archetype.name)
        .bind(&archetype.title)
        .bind(&archetype.color_pair)
        .bind(&archetype.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create archetype in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(archetype_from_row(&row)?)
    }

    #[instrument(skip(self))]
    async fn get_archetype(&self, archetype_id: i64) -> Result<Option<ArchetypeModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, set_id, name, title, color_pair, description, created_at \
             FROM archetypes WHERE id = $1",
        )
        .bind(archetype_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, archetype_id, "Failed to fetch archetype from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(archetype_from_row).transpose()?)
    }

    #[instrument(skip(self))]
    async fn list_archetypes_for_set(&self, set_id: i64) -> Result<Vec<ArchetypeModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, set_id, name, title, color_pair, description, created_at \
             FROM archetypes WHERE set_id = $1 ORDER BY id",
        )
        .bind(set_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, set_id, "Failed to list archetypes from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows
            .iter()
            .map(archetype_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self, archetype))]
    async fn update_archetype(&self, archetype: &ArchetypeModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE archetypes SET name = $2, title = $3, color_pair = $4, description = $5 \
             WHERE id = $1",
        )
        .bind(archetype.id)
        .bind(&archetype.name)
        .bind(&archetype.title)
        .bind(&archetype.color_pair)
        .bind(&archetype.description)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, archetype_id = archetype.id, "Failed to update archetype");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Archetype not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_archetype(&self, archetype_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM archetypes WHERE id = $1")
            .bind(archetype_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, archetype_id, "Failed to delete archetype");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Archetype not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_archetypes_for_set(&self, set_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM archetypes WHERE set_id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, set_id, "Failed to delete archetypes for set");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
