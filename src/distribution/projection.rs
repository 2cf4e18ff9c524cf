use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::{
    schema::{Bucket, BucketTargets, Color, Rarity},
    slots::{SlotAssigner, SlotPosition},
    AccountedCard,
};

/// Card predicates, combined with AND. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    /// Case-insensitive substring of the card name
    pub name: Option<String>,
    /// Case-insensitive substring of the type line
    pub type_line: Option<String>,
    pub rarity: Option<Rarity>,
    pub archetype_id: Option<i64>,
    /// Card matches when it shares any of these colors
    #[serde(default)]
    pub colors: Vec<Color>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl CardFilter {
    pub fn is_active(&self) -> bool {
        non_blank(&self.name).is_some()
            || non_blank(&self.type_line).is_some()
            || self.rarity.is_some()
            || self.archetype_id.is_some()
            || !self.colors.is_empty()
    }

    pub fn matches<C: AccountedCard>(&self, card: &C) -> bool {
        if let Some(name) = non_blank(&self.name) {
            if !contains_ignore_case(card.name(), name) {
                return false;
            }
        }
        if let Some(type_line) = non_blank(&self.type_line) {
            if !contains_ignore_case(card.type_line(), type_line) {
                return false;
            }
        }
        if let Some(rarity) = self.rarity {
            if card.rarity() != rarity {
                return false;
            }
        }
        if let Some(archetype_id) = self.archetype_id {
            if card.archetype_id() != Some(archetype_id) {
                return false;
            }
        }
        if !self.colors.is_empty() && !card.colors().iter().any(|c| self.colors.contains(c)) {
            return false;
        }
        true
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    Name,
    Rarity,
    TypeLine,
    ManaCost,
    #[default]
    CreationOrder,
    CreatedAt,
    Slot,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    #[strum(serialize = "asc", serialize = "ascending")]
    Ascending,
    #[serde(rename = "desc")]
    #[strum(serialize = "desc", serialize = "descending")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Everything a grid view asks for: which cards, in what order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub filter: CardFilter,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ViewConfig {
    /// Picking the current key again flips the direction; a new key starts
    /// ascending.
    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// One cell of the rendered grid
#[derive(Debug)]
pub enum GridEntry<'a, C> {
    Card { position: u32, card: &'a C },
    Empty { position: u32, expected_bucket: Bucket },
}

impl<'a, C> GridEntry<'a, C> {
    pub fn position(&self) -> u32 {
        match self {
            GridEntry::Card { position, .. } | GridEntry::Empty { position, .. } => *position,
        }
    }

    pub fn card(&self) -> Option<&'a C> {
        match self {
            GridEntry::Card { card, .. } => Some(*card),
            GridEntry::Empty { .. } => None,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        matches!(self, GridEntry::Empty { .. })
    }
}

/// The ordered grid plus the cards that did not fit inside it
#[derive(Debug)]
pub struct Projection<'a, C> {
    pub entries: Vec<GridEntry<'a, C>>,
    /// Cards placed outside the fixed grid, at their fallback position
    pub overflow: Vec<GridEntry<'a, C>>,
    pub slots: SlotAssigner,
}

fn compare_by<C: AccountedCard>(a: &C, b: &C, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Rarity => a.rarity().cmp(&b.rarity()),
        SortKey::TypeLine => a
            .type_line()
            .to_lowercase()
            .cmp(&b.type_line().to_lowercase()),
        SortKey::ManaCost => a.mana_cost().cmp(b.mana_cost()),
        SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortKey::CreationOrder | SortKey::Slot => Ordering::Equal,
    };
    primary.then_with(|| a.id().cmp(&b.id()))
}

fn sort_cards<C: AccountedCard>(cards: &mut [&C], key: SortKey, direction: SortDirection) {
    cards.sort_by(|a, b| match direction {
        SortDirection::Ascending => compare_by(*a, *b, key),
        SortDirection::Descending => compare_by(*b, *a, key),
    });
}

/// Builds the grid a set view renders.
///
/// Sorting by slot always lays out the full `total_cards` grid with empty
/// placeholders, even while a filter is set. Otherwise an active filter
/// yields only the matching cards in sort order, and no filter yields the
/// full grid in creation order whatever the sort key.
pub fn project<'a, C: AccountedCard>(
    total_cards: u32,
    targets: &BucketTargets,
    cards: &'a [C],
    view: &ViewConfig,
) -> Projection<'a, C> {
    let slots = SlotAssigner::new(targets, cards);

    if view.sort == SortKey::Slot {
        return slot_grid(total_cards, cards, view.direction, slots);
    }

    if view.filter.is_active() {
        let mut selected: Vec<&C> = cards
            .iter()
            .filter(|card| view.filter.matches(*card))
            .collect();
        sort_cards(&mut selected, view.sort, view.direction);

        let entries = selected
            .into_iter()
            .enumerate()
            .map(|(index, card)| GridEntry::Card {
                position: index as u32 + 1,
                card,
            })
            .collect();
        return Projection {
            entries,
            overflow: Vec::new(),
            slots,
        };
    }

    let mut in_creation_order: Vec<&C> = cards.iter().collect();
    sort_cards(&mut in_creation_order, SortKey::CreationOrder, SortDirection::Ascending);

    let mut entries = Vec::with_capacity(total_cards as usize);
    let mut overflow = Vec::new();
    let mut placed = in_creation_order.into_iter();
    for position in 1..=total_cards {
        match placed.next() {
            Some(card) => entries.push(GridEntry::Card { position, card }),
            None => entries.push(GridEntry::Empty {
                position,
                expected_bucket: slots.expected_bucket_at(position),
            }),
        }
    }
    for (offset, card) in placed.enumerate() {
        overflow.push(GridEntry::Card {
            position: total_cards + offset as u32 + 1,
            card,
        });
    }

    Projection {
        entries,
        overflow,
        slots,
    }
}

fn slot_grid<'a, C: AccountedCard>(
    total_cards: u32,
    cards: &'a [C],
    direction: SortDirection,
    slots: SlotAssigner,
) -> Projection<'a, C> {
    let mut by_position: HashMap<u32, &'a C> = HashMap::new();
    let mut outside: Vec<(u32, &'a C)> = Vec::new();

    for card in cards {
        match slots.position_of(card.id()) {
            Some(SlotPosition::Reserved(p)) if p <= total_cards => {
                by_position.insert(p, card);
            }
            Some(position) => outside.push((position.value(), card)),
            None => {}
        }
    }

    let mut entries: Vec<GridEntry<'a, C>> = (1..=total_cards)
        .map(|position| match by_position.remove(&position) {
            Some(card) => GridEntry::Card { position, card },
            None => GridEntry::Empty {
                position,
                expected_bucket: slots.expected_bucket_at(position),
            },
        })
        .collect();

    outside.sort_by(|(pa, a), (pb, b)| pa.cmp(pb).then_with(|| a.id().cmp(&b.id())));
    let mut overflow: Vec<GridEntry<'a, C>> = outside
        .into_iter()
        .map(|(position, card)| GridEntry::Card { position, card })
        .collect();

    if direction == SortDirection::Descending {
        entries.reverse();
        overflow.reverse();
    }

    Projection {
        entries,
        overflow,
        slots,
    }
}
