use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    schema::{Bucket, BucketTargets, Color, SlotRange},
    AccountedCard,
};

/// Sorts a card's colors into exactly one bucket.
///
/// Classification looks at colors only: a card with no colors is colorless
/// even when its type line says it is a land.
pub fn classify(colors: &[Color]) -> Bucket {
    let mut distinct = colors.to_vec();
    distinct.sort();
    distinct.dedup();

    match distinct.as_slice() {
        [] => Bucket::Colorless,
        [color] => Bucket::from(*color),
        _ => Bucket::Multicolor,
    }
}

/// Bucket whose range holds `position`, or colorless when no range does
pub fn expected_bucket_at(ranges: &[SlotRange], position: u32) -> Bucket {
    ranges
        .iter()
        .find(|range| range.contains(position))
        .map(|range| range.bucket)
        .unwrap_or(Bucket::Colorless)
}

/// Where a card lands on the set grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "position", rename_all = "snake_case")]
pub enum SlotPosition {
    /// Inside its bucket's reserved range
    Reserved(u32),
    /// Bucket is full (or has no range); carries the card's raw 1-based
    /// index in creation order
    Overflow(u32),
}

impl SlotPosition {
    pub fn value(&self) -> u32 {
        match self {
            SlotPosition::Reserved(p) | SlotPosition::Overflow(p) => *p,
        }
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, SlotPosition::Reserved(_))
    }
}

/// Slot positions for every card of a set, computed in one pass
#[derive(Debug, Clone)]
pub struct SlotAssigner {
    ranges: Vec<SlotRange>,
    positions: HashMap<i64, SlotPosition>,
    buckets: HashMap<i64, Bucket>,
}

impl SlotAssigner {
    pub fn new<C: AccountedCard>(targets: &BucketTargets, cards: &[C]) -> Self {
        let ranges = targets.slot_ranges();

        let mut ordered: Vec<&C> = cards.iter().collect();
        ordered.sort_by_key(|card| card.id());

        let mut filled: HashMap<Bucket, u32> = HashMap::new();
        let mut positions = HashMap::with_capacity(ordered.len());
        let mut buckets = HashMap::with_capacity(ordered.len());

        for (index, card) in ordered.into_iter().enumerate() {
            let bucket = classify(card.colors());
            let index_in_bucket = filled.entry(bucket).or_insert(0);
            let raw_index = (index as u32).saturating_add(1);

            let position = match ranges.iter().find(|range| range.bucket == bucket) {
                Some(range) if *index_in_bucket < range.width() => {
                    SlotPosition::Reserved(range.start + *index_in_bucket)
                }
                _ => SlotPosition::Overflow(raw_index),
            };

            *index_in_bucket += 1;
            positions.insert(card.id(), position);
            buckets.insert(card.id(), bucket);
        }

        Self {
            ranges,
            positions,
            buckets,
        }
    }

    pub fn ranges(&self) -> &[SlotRange] {
        &self.ranges
    }

    pub fn position_of(&self, card_id: i64) -> Option<SlotPosition> {
        self.positions.get(&card_id).copied()
    }

    pub fn bucket_of(&self, card_id: i64) -> Option<Bucket> {
        self.buckets.get(&card_id).copied()
    }

    pub fn expected_bucket_at(&self, position: u32) -> Bucket {
        expected_bucket_at(&self.ranges, position)
    }
}
