use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{normalize_color_pair, ArchetypeModel, NewArchetype},
    repository::ArchetypeRepository,
    types::{ArchetypeResponse, CreateArchetypeRequest, UpdateArchetypeRequest},
};
use crate::card::repository::CardRepository;
use crate::config::MAX_TITLE_LENGTH;
use crate::set::repository::SetRepository;
use crate::shared::{check_length, require_name, AppError};

/// Blank titles fall back to the archetype name
fn title_or_name(title: Option<&str>, name: &str) -> Result<String, AppError> {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            check_length(title, MAX_TITLE_LENGTH, "title")?;
            Ok(title.to_string())
        }
        None => Ok(name.to_string()),
    }
}

/// Service for archetype business logic
pub struct ArchetypeService {
    sets: Arc<dyn SetRepository + Send + Sync>,
    archetypes: Arc<dyn ArchetypeRepository + Send + Sync>,
    cards: Arc<dyn CardRepository + Send + Sync>,
}

impl ArchetypeService {
    pub fn new(
        sets: Arc<dyn SetRepository + Send + Sync>,
        archetypes: Arc<dyn ArchetypeRepository + Send + Sync>,
        cards: Arc<dyn CardRepository + Send + Sync>,
    ) -> Self {
        Self {
            sets,
            archetypes,
            cards,
        }
    }

    async fn ensure_set(&self, set_id: i64) -> Result<(), AppError> {
        match self.sets.get_set(set_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Set {} not found", set_id))),
        }
    }

    async fn require_archetype(&self, archetype_id: i64) -> Result<ArchetypeModel, AppError> {
        self.archetypes
            .get_archetype(archetype_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Archetype {} not found", archetype_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_archetypes(&self, set_id: i64) -> Result<Vec<ArchetypeResponse>, AppError> {
        self.ensure_set(set_id).await?;
        let archetypes = self.archetypes.list_archetypes_for_set(set_id).await?;
        Ok(archetypes.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn create_archetype(
        &self,
        set_id: i64,
        request: CreateArchetypeRequest,
    ) -> Result<ArchetypeResponse, AppError> {
        self.ensure_set(set_id).await?;
        let name = require_name(&request.name, "Archetype")?;
        let color_pair = normalize_color_pair(&request.color_pair)?;
        let title = title_or_name(request.title.as_deref(), &name)?;

        let archetype = self
            .archetypes
            .create_archetype(&NewArchetype {
                set_id,
                title,
                name,
                color_pair,
                description: request.description,
            })
            .await?;

        info!(
            archetype_id = archetype.id,
            set_id,
            color_pair = %archetype.color_pair,
            "Archetype created"
        );
        Ok(archetype.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update_archetype(
        &self,
        archetype_id: i64,
        request: UpdateArchetypeRequest,
    ) -> Result<ArchetypeResponse, AppError> {
        let mut archetype = self.require_archetype(archetype_id).await?;

        if let Some(name) = &request.name {
            archetype.name = require_name(name, "Archetype")?;
        }
        if let Some(title) = &request.title {
            archetype.title = title_or_name(Some(title), &archetype.name)?;
        }
        if let Some(color_pair) = &request.color_pair {
            archetype.color_pair = normalize_color_pair(color_pair)?;
        }
        if let Some(description) = request.description {
            archetype.description = description;
        }

        self.archetypes.update_archetype(&archetype).await?;
        info!(archetype_id, "Archetype updated");

        Ok(archetype.into())
    }

    /// Deletes an archetype and unlinks the cards that pointed at it
    #[instrument(skip(self))]
    pub async fn delete_archetype(&self, archetype_id: i64) -> Result<(), AppError> {
        self.require_archetype(archetype_id).await?;

        let unlinked = self.cards.clear_archetype(archetype_id).await?;
        self.archetypes.delete_archetype(archetype_id).await?;

        info!(archetype_id, unlinked, "Archetype deleted");
        Ok(())
    }
}
