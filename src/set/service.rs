use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewSet, SetModel},
    repository::SetRepository,
    types::{
        CreateSetRequest, GridEntryResponse, GridResponse, NumberCrunchResponse,
        SetDetailResponse, SetSummaryResponse, UpdateSetRequest, WarningResponse,
    },
};
use crate::archetype::{models::ArchetypeModel, repository::ArchetypeRepository};
use crate::card::{models::CardModel, repository::CardRepository, types::CardResponse};
use crate::config::MAX_TOTAL_CARDS;
use crate::distribution::{
    crunch, project, BucketTargets, CrunchReport, GridEntry, RarityTargets, SlotAssigner,
    ViewConfig,
};
use crate::shared::{require_name, AppError};

fn check_limit(value: u32, field: &str) -> Result<(), AppError> {
    if value > MAX_TOTAL_CARDS {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {}",
            field, MAX_TOTAL_CARDS
        )));
    }
    Ok(())
}

fn validate_counts(
    total_cards: u32,
    buckets: &BucketTargets,
    rarities: &RarityTargets,
) -> Result<(), AppError> {
    check_limit(total_cards, "total_cards")?;
    check_limit(buckets.sum(), "sum of color targets")?;
    check_limit(rarities.sum(), "sum of rarity targets")
}

/// Service for set business logic and the accounting views
pub struct SetService {
    sets: Arc<dyn SetRepository + Send + Sync>,
    cards: Arc<dyn CardRepository + Send + Sync>,
    archetypes: Arc<dyn ArchetypeRepository + Send + Sync>,
}

impl SetService {
    pub fn new(
        sets: Arc<dyn SetRepository + Send + Sync>,
        cards: Arc<dyn CardRepository + Send + Sync>,
        archetypes: Arc<dyn ArchetypeRepository + Send + Sync>,
    ) -> Self {
        Self {
            sets,
            cards,
            archetypes,
        }
    }

    async fn require_set(&self, set_id: i64) -> Result<SetModel, AppError> {
        self.sets.get_set(set_id).await?.ok_or_else(|| {
            warn!(set_id, "Set not found");
            AppError::NotFound(format!("Set {} not found", set_id))
        })
    }

    #[instrument(skip(self, request))]
    pub async fn create_set(&self, request: CreateSetRequest) -> Result<SetModel, AppError> {
        let name = require_name(&request.name, "Set")?;
        validate_counts(
            request.total_cards,
            &request.bucket_targets,
            &request.rarity_targets,
        )?;

        let set = self
            .sets
            .create_set(&NewSet {
                name,
                description: request.description,
                total_cards: request.total_cards,
                bucket_targets: request.bucket_targets,
                rarity_targets: request.rarity_targets,
            })
            .await?;

        for warning in set.warnings() {
            debug!(set_id = set.id, %warning, "Set targets do not add up");
        }
        info!(set_id = set.id, name = %set.name, "Set created");

        Ok(set)
    }

    #[instrument(skip(self))]
    pub async fn list_sets(&self) -> Result<Vec<SetSummaryResponse>, AppError> {
        let sets = self.sets.list_sets().await?;

        let mut summaries = Vec::with_capacity(sets.len());
        for set in sets {
            let card_count = self.cards.count_cards_for_set(set.id).await?;
            summaries.push(SetSummaryResponse {
                completion_percent: crunch::completion_percent(card_count, set.total_cards),
                card_count,
                set,
            });
        }

        debug!(set_count = summaries.len(), "Sets listed");
        Ok(summaries)
    }

    #[instrument(skip(self))]
    pub async fn get_set_details(&self, set_id: i64) -> Result<SetDetailResponse, AppError> {
        let set = self.require_set(set_id).await?;
        let cards = self.cards.list_cards_for_set(set_id).await?;
        let archetypes = self.archetypes.list_archetypes_for_set(set_id).await?;

        let slots = SlotAssigner::new(&set.bucket_targets, &cards);
        let by_id: HashMap<i64, &ArchetypeModel> = archetypes.iter().map(|a| (a.id, a)).collect();
        let card_responses = cards
            .iter()
            .map(|card| {
                let archetype = card.archetype_id.and_then(|id| by_id.get(&id).copied());
                CardResponse::from_model(card, archetype, slots.position_of(card.id))
            })
            .collect();

        let card_count = u32::try_from(cards.len()).unwrap_or(u32::MAX);
        Ok(SetDetailResponse {
            card_count,
            completion_percent: crunch::completion_percent(card_count, set.total_cards),
            remaining: crunch::remaining(card_count, set.total_cards),
            warnings: set.warnings().into_iter().map(WarningResponse::from).collect(),
            archetypes: archetypes.into_iter().map(Into::into).collect(),
            cards: card_responses,
            set,
        })
    }

    /// Applies the fields present in the request and refreshes `updated_at`
    #[instrument(skip(self, request))]
    pub async fn update_set(
        &self,
        set_id: i64,
        request: UpdateSetRequest,
    ) -> Result<SetModel, AppError> {
        let mut set = self.require_set(set_id).await?;

        if let Some(name) = &request.name {
            set.name = require_name(name, "Set")?;
        }
        if let Some(description) = &request.description {
            set.description = description.clone();
        }
        if let Some(total_cards) = request.total_cards {
            set.total_cards = total_cards;
        }
        for (bucket, value) in request.bucket_updates() {
            set.bucket_targets.set(bucket, value);
        }
        request.apply_rarity_targets(&mut set.rarity_targets);
        validate_counts(set.total_cards, &set.bucket_targets, &set.rarity_targets)?;

        set.touch();
        self.sets.update_set(&set).await?;
        info!(set_id, "Set updated");

        Ok(set)
    }

    /// Deletes a set together with its cards and archetypes
    #[instrument(skip(self))]
    pub async fn delete_set(&self, set_id: i64) -> Result<(), AppError> {
        self.require_set(set_id).await?;

        let cards = self.cards.delete_cards_for_set(set_id).await?;
        let archetypes = self.archetypes.delete_archetypes_for_set(set_id).await?;
        self.sets.delete_set(set_id).await?;

        info!(set_id, cards, archetypes, "Set deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn number_crunch(&self, set_id: i64) -> Result<NumberCrunchResponse, AppError> {
        let set = self.require_set(set_id).await?;
        let cards = self.cards.list_cards_for_set(set_id).await?;

        let report = CrunchReport::compute(
            set.total_cards,
            &set.bucket_targets,
            &set.rarity_targets,
            &cards,
        );
        debug!(
            set_id,
            card_count = report.card_count,
            completion_percent = report.completion_percent,
            "Number crunch computed"
        );

        Ok(NumberCrunchResponse {
            set_id: set.id,
            set_name: set.name,
            warning_messages: report.warnings.iter().map(ToString::to_string).collect(),
            report,
        })
    }

    #[instrument(skip(self))]
    pub async fn grid(&self, set_id: i64, view: ViewConfig) -> Result<GridResponse, AppError> {
        let set = self.require_set(set_id).await?;
        let cards = self.cards.list_cards_for_set(set_id).await?;
        let archetypes = self.archetypes.list_archetypes_for_set(set_id).await?;
        let by_id: HashMap<i64, &ArchetypeModel> = archetypes.iter().map(|a| (a.id, a)).collect();

        let projection = project(set.total_cards, &set.bucket_targets, &cards, &view);

        let to_response = |entry: &GridEntry<'_, CardModel>| match entry {
            GridEntry::Card { position, card } => GridEntryResponse::Card {
                position: *position,
                card: CardResponse::from_model(
                    card,
                    card.archetype_id.and_then(|id| by_id.get(&id).copied()),
                    projection.slots.position_of(card.id),
                ),
            },
            GridEntry::Empty {
                position,
                expected_bucket,
            } => GridEntryResponse::Empty {
                position: *position,
                expected_bucket: *expected_bucket,
            },
        };

        let entries: Vec<GridEntryResponse> = projection.entries.iter().map(to_response).collect();
        let overflow: Vec<GridEntryResponse> =
            projection.overflow.iter().map(to_response).collect();
        debug!(
            set_id,
            entries = entries.len(),
            overflow = overflow.len(),
            "Grid projected"
        );

        Ok(GridResponse {
            set_id,
            total_cards: set.total_cards,
            sort: view.sort,
            direction: view.direction,
            filtered: view.filter.is_active(),
            entries,
            overflow,
        })
    }
}
