use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    mana::colors_from_mana_cost,
    models::{dedup_colors, CardModel, NewCard},
    repository::CardRepository,
    types::{CardResponse, CreateCardRequest, UpdateCardRequest},
};
use crate::archetype::{models::ArchetypeModel, repository::ArchetypeRepository};
use crate::distribution::Color;
use crate::set::repository::SetRepository;
use crate::config::{MAX_MANA_COST_LENGTH, MAX_STAT_LENGTH, MAX_TYPE_LINE_LENGTH};
use crate::shared::{check_length, require_name, AppError};

/// Explicit colors win; otherwise they are read off the mana cost
fn resolve_colors(explicit: Vec<Color>, mana_cost: &str) -> Vec<Color> {
    if explicit.is_empty() {
        colors_from_mana_cost(mana_cost)
    } else {
        dedup_colors(explicit)
    }
}

/// Service for card business logic
pub struct CardService {
    sets: Arc<dyn SetRepository + Send + Sync>,
    cards: Arc<dyn CardRepository + Send + Sync>,
    archetypes: Arc<dyn ArchetypeRepository + Send + Sync>,
}

impl CardService {
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

    /// Looks up an archetype and checks it belongs to `set_id`
    async fn archetype_in_set(
        &self,
        archetype_id: Option<i64>,
        set_id: i64,
    ) -> Result<Option<ArchetypeModel>, AppError> {
        let Some(archetype_id) = archetype_id else {
            return Ok(None);
        };

        match self.archetypes.get_archetype(archetype_id).await? {
            Some(archetype) if archetype.set_id == set_id => Ok(Some(archetype)),
            Some(_) => {
                warn!(archetype_id, set_id, "Archetype belongs to another set");
                Err(AppError::BadRequest(format!(
                    "Archetype {} does not belong to set {}",
                    archetype_id, set_id
                )))
            }
            None => Err(AppError::BadRequest(format!(
                "Archetype {} does not exist",
                archetype_id
            ))),
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_card(
        &self,
        set_id: i64,
        request: CreateCardRequest,
    ) -> Result<CardResponse, AppError> {
        if self.sets.get_set(set_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Set {} not found", set_id)));
        }

        let name = require_name(&request.name, "Card")?;
        check_length(&request.mana_cost, MAX_MANA_COST_LENGTH, "mana_cost")?;
        check_length(&request.type_line, MAX_TYPE_LINE_LENGTH, "type_line")?;
        check_length(&request.power, MAX_STAT_LENGTH, "power")?;
        check_length(&request.toughness, MAX_STAT_LENGTH, "toughness")?;
        let archetype = self.archetype_in_set(request.archetype_id, set_id).await?;
        let colors = resolve_colors(request.colors, &request.mana_cost);
        debug!(?colors, mana_cost = %request.mana_cost, "Resolved card colors");

        let card = self
            .cards
            .create_card(&NewCard {
                set_id,
                name,
                mana_cost: request.mana_cost,
                type_line: request.type_line,
                text: request.text,
                power: request.power,
                toughness: request.toughness,
                colors,
                rarity: request.rarity,
                archetype_id: request.archetype_id,
            })
            .await?;

        info!(card_id = card.id, set_id, name = %card.name, "Card created");
        Ok(CardResponse::from_model(&card, archetype.as_ref(), None))
    }

    /// Applies the fields present in the request.
    ///
    /// Colors follow the same rule as on creation: a non-empty `colors`
    /// list wins, else a non-empty `mana_cost` is parsed, else the stored
    /// colors stay.
    #[instrument(skip(self, request))]
    pub async fn update_card(
        &self,
        card_id: i64,
        request: UpdateCardRequest,
    ) -> Result<CardModel, AppError> {
        let mut card = self
            .cards
            .get_card(card_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Card {} not found", card_id)))?;

        if let Some(name) = &request.name {
            card.name = require_name(name, "Card")?;
        }
        if let Some(archetype_id) = request.archetype_id {
            self.archetype_in_set(archetype_id, card.set_id).await?;
            card.archetype_id = archetype_id;
        }

        let explicit_colors = request.colors.unwrap_or_default();
        if !explicit_colors.is_empty() {
            card.colors = dedup_colors(explicit_colors);
        } else if let Some(cost) = request
            .mana_cost
            .as_deref()
            .filter(|cost| !cost.trim().is_empty())
        {
            card.colors = colors_from_mana_cost(cost);
        }
        // An explicit empty cost is stored even though it leaves the colors alone
        if let Some(cost) = request.mana_cost {
            check_length(&cost, MAX_MANA_COST_LENGTH, "mana_cost")?;
            card.mana_cost = cost;
        }

        if let Some(type_line) = request.type_line {
            check_length(&type_line, MAX_TYPE_LINE_LENGTH, "type_line")?;
            card.type_line = type_line;
        }
        if let Some(text) = request.text {
            card.text = text;
        }
        if let Some(power) = request.power {
            check_length(&power, MAX_STAT_LENGTH, "power")?;
            card.power = power;
        }
        if let Some(toughness) = request.toughness {
            check_length(&toughness, MAX_STAT_LENGTH, "toughness")?;
            card.toughness = toughness;
        }
        if let Some(rarity) = request.rarity {
            card.rarity = rarity;
        }

        self.cards.update_card(&card).await?;
        info!(card_id, "Card updated");

        Ok(card)
    }

    #[instrument(skip(self))]
    pub async fn delete_card(&self, card_id: i64) -> Result<(), AppError> {
        self.cards.delete_card(card_id).await?;
        info!(card_id, "Card deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::models::NewArchetype;
    use crate::archetype::repository::InMemoryArchetypeRepository;
    use crate::card::repository::InMemoryCardRepository;
    use crate::distribution::{BucketTargets, Rarity, RarityTargets};
    use crate::set::models::NewSet;
    use crate::set::repository::InMemorySetRepository;

    struct Fixture {
        sets: Arc<InMemorySetRepository>,
        cards: Arc<InMemoryCardRepository>,
        archetypes: Arc<InMemoryArchetypeRepository>,
        service: CardService,
    }

    fn fixture() -> Fixture {
        let sets = Arc::new(InMemorySetRepository::new());
        let cards = Arc::new(InMemoryCardRepository::new());
        let archetypes = Arc::new(InMemoryArchetypeRepository::new());
        let service = CardService::new(sets.clone(), cards.clone(), archetypes.clone());
        Fixture {
            sets,
            cards,
            archetypes,
            service,
        }
    }

    async fn create_set(f: &Fixture) -> i64 {
        f.sets
            .create_set(&NewSet {
                name: "Set".to_string(),
                description: String::new(),
                total_cards: 10,
                bucket_targets: BucketTargets::default(),
                rarity_targets: RarityTargets::default(),
            })
            .await
            .unwrap()
            .id
    }

    async fn create_archetype(f: &Fixture, set_id: i64) -> i64 {
        f.archetypes
            .create_archetype(&NewArchetype {
                set_id,
                name: "Spells".to_string(),
                title: "Spells".to_string(),
                color_pair: "UR".to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    fn request(json: &str) -> CreateCardRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_create_card_derives_colors_from_mana_cost() {
        let f = fixture();
        let set_id = create_set(&f).await;

        let card = f
            .service
            .create_card(
                set_id,
                request(r#"{"name": "Electrolyze", "mana_cost": "{1}{U}{R}"}"#),
            )
            .await
            .unwrap();

        assert_eq!(card.colors, vec![Color::Blue, Color::Red]);
        assert_eq!(card.rarity, Rarity::Common);
        assert_eq!(card.bucket, crate::distribution::Bucket::Multicolor);
    }

    #[tokio::test]
    async fn test_create_card_keeps_explicit_colors() {
        let f = fixture();
        let set_id = create_set(&f).await;

        let card = f
            .service
            .create_card(
                set_id,
                request(
                    r#"{"name": "Odd", "mana_cost": "{R}", "colors": ["green", "green"]}"#,
                ),
            )
            .await
            .unwrap();

        assert_eq!(card.colors, vec![Color::Green]);
    }

    #[tokio::test]
    async fn test_create_card_validates_set_and_archetype() {
        let f = fixture();
        let set_id = create_set(&f).await;
        let other_set = create_set(&f).await;
        let foreign = create_archetype(&f, other_set).await;

        assert!(matches!(
            f.service
                .create_card(99, request(r#"{"name": "Lost"}"#))
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service
                .create_card(set_id, request(r#"{"name": "  "}"#))
                .await,
            Err(AppError::BadRequest(_))
        ));
        let with_foreign = format!(r#"{{"name": "Stray", "archetype_id": {}}}"#, foreign);
        assert!(matches!(
            f.service.create_card(set_id, request(&with_foreign)).await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(f.cards.card_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_card_links_archetype() {
        let f = fixture();
        let set_id = create_set(&f).await;
        let archetype_id = create_archetype(&f, set_id).await;

        let body = format!(r#"{{"name": "Prodigy", "archetype_id": {}}}"#, archetype_id);
        let card = f.service.create_card(set_id, request(&body)).await.unwrap();

        assert_eq!(card.archetype_id, Some(archetype_id));
        assert_eq!(card.archetype.unwrap().color_pair, "UR");
    }

    #[tokio::test]
    async fn test_update_card_colors_rules() {
        let f = fixture();
        let set_id = create_set(&f).await;
        let card = f
            .service
            .create_card(set_id, request(r#"{"name": "Bear", "mana_cost": "{1}{G}"}"#))
            .await
            .unwrap();

        // New mana cost without colors re-derives them
        let update: UpdateCardRequest =
            serde_json::from_str(r#"{"mana_cost": "{W}{B}"}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.colors, vec![Color::White, Color::Black]);
        assert_eq!(updated.mana_cost, "{W}{B}");

        // Neither given keeps what is stored
        let update: UpdateCardRequest = serde_json::from_str(r#"{"text": "Trample"}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.colors, vec![Color::White, Color::Black]);
        assert_eq!(updated.text, "Trample");

        // Explicit colors win over the mana cost
        let update: UpdateCardRequest =
            serde_json::from_str(r#"{"mana_cost": "{U}", "colors": ["red"]}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.colors, vec![Color::Red]);
        assert_eq!(updated.mana_cost, "{U}");
    }

    #[tokio::test]
    async fn test_update_card_stores_empty_mana_cost() {
        let f = fixture();
        let set_id = create_set(&f).await;
        let card = f
            .service
            .create_card(set_id, request(r#"{"name": "Shock", "mana_cost": "{R}"}"#))
            .await
            .unwrap();

        let update: UpdateCardRequest = serde_json::from_str(r#"{"mana_cost": ""}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.mana_cost, "");
        assert_eq!(updated.colors, vec![Color::Red]);

        let stored = f.cards.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.mana_cost, "");
    }

    #[tokio::test]
    async fn test_card_text_fields_are_bounded() {
        let f = fixture();
        let set_id = create_set(&f).await;

        let long_cost = format!(
            r#"{{"name": "Greedy", "mana_cost": "{}"}}"#,
            "{W}".repeat(17)
        );
        assert!(matches!(
            f.service.create_card(set_id, request(&long_cost)).await,
            Err(AppError::BadRequest(_))
        ));
        let long_power = format!(
            r#"{{"name": "Huge", "power": "{}"}}"#,
            "9".repeat(MAX_STAT_LENGTH + 1)
        );
        assert!(matches!(
            f.service.create_card(set_id, request(&long_power)).await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(f.cards.card_count().await, 0);

        let card = f
            .service
            .create_card(
                set_id,
                request(r#"{"name": "Bear", "type_line": "Creature - Bear", "toughness": "2"}"#),
            )
            .await
            .unwrap();

        let update = UpdateCardRequest {
            type_line: Some("x".repeat(MAX_TYPE_LINE_LENGTH + 1)),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update_card(card.id, update).await,
            Err(AppError::BadRequest(_))
        ));
        let update = UpdateCardRequest {
            toughness: Some("1".repeat(MAX_STAT_LENGTH + 1)),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update_card(card.id, update).await,
            Err(AppError::BadRequest(_))
        ));

        let stored = f.cards.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.type_line, "Creature - Bear");
        assert_eq!(stored.toughness, "2");
    }

    #[tokio::test]
    async fn test_update_card_clears_archetype_on_null() {
        let f = fixture();
        let set_id = create_set(&f).await;
        let archetype_id = create_archetype(&f, set_id).await;
        let body = format!(r#"{{"name": "Prodigy", "archetype_id": {}}}"#, archetype_id);
        let card = f.service.create_card(set_id, request(&body)).await.unwrap();

        let update: UpdateCardRequest = serde_json::from_str(r#"{"name": "Renamed"}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.archetype_id, Some(archetype_id));

        let update: UpdateCardRequest =
            serde_json::from_str(r#"{"archetype_id": null}"#).unwrap();
        let updated = f.service.update_card(card.id, update).await.unwrap();
        assert_eq!(updated.archetype_id, None);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_card() {
        let f = fixture();
        assert!(matches!(
            f.service
                .update_card(7, UpdateCardRequest::default())
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete_card(7).await,
            Err(AppError::NotFound(_))
        ));
    }
}
