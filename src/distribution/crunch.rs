use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum::IntoEnumIterator;

use super::{
    schema::{Bucket, BucketTargets, Rarity, RarityTargets},
    slots::classify,
    AccountedCard,
};

/// Target vs. actual for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketLine {
    pub bucket: Bucket,
    pub target: u32,
    pub actual: u32,
    /// actual - target: positive is a surplus, negative a deficit
    pub delta: i64,
    /// Share of the set's existing cards that sit in this bucket
    pub percent_of_actual: f64,
}

/// Target vs. actual for one rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityLine {
    pub rarity: Rarity,
    pub target: u32,
    pub actual: u32,
    pub delta: i64,
    pub percent_of_actual: f64,
}

/// Target sums that disagree with the set's total card count.
/// Reported to the designer, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetWarning {
    BucketSumMismatch { total_cards: u32, bucket_sum: u32 },
    RaritySumMismatch { total_cards: u32, rarity_sum: u32 },
}

impl fmt::Display for TargetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetWarning::BucketSumMismatch {
                total_cards,
                bucket_sum,
            } => write!(
                f,
                "Color targets add up to {} but the set has {} cards",
                bucket_sum, total_cards
            ),
            TargetWarning::RaritySumMismatch {
                total_cards,
                rarity_sum,
            } => write!(
                f,
                "Rarity targets add up to {} but the set has {} cards",
                rarity_sum, total_cards
            ),
        }
    }
}

/// Checks the soft invariants between a set's total and its targets.
/// Rarity targets that were never filled in (all zero) are not flagged.
pub fn target_warnings(
    total_cards: u32,
    buckets: &BucketTargets,
    rarities: &RarityTargets,
) -> Vec<TargetWarning> {
    let mut warnings = Vec::new();

    let bucket_sum = buckets.sum();
    if bucket_sum != total_cards {
        warnings.push(TargetWarning::BucketSumMismatch {
            total_cards,
            bucket_sum,
        });
    }

    let rarity_sum = rarities.sum();
    if rarity_sum != 0 && rarity_sum != total_cards {
        warnings.push(TargetWarning::RaritySumMismatch {
            total_cards,
            rarity_sum,
        });
    }

    warnings
}

/// Unclamped ratio of created to target cards; 0.0 for an empty target
pub fn completion_ratio(card_count: u32, total_cards: u32) -> f64 {
    if total_cards == 0 {
        return 0.0;
    }
    card_count as f64 / total_cards as f64
}

/// Rounded completion percentage clamped to [0, 100]
pub fn completion_percent(card_count: u32, total_cards: u32) -> u32 {
    let percent = (completion_ratio(card_count, total_cards) * 100.0).round();
    percent.clamp(0.0, 100.0) as u32
}

pub fn remaining(card_count: u32, total_cards: u32) -> u32 {
    total_cards.saturating_sub(card_count)
}

fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        "card"
    } else {
        "cards"
    }
}

/// One line per unbalanced bucket, or a single confirmation when every
/// bucket matches its target
pub fn recommendations(lines: &[BucketLine]) -> Vec<String> {
    let advice: Vec<String> = lines
        .iter()
        .filter_map(|line| {
            let magnitude = line.delta.unsigned_abs();
            match line.delta {
                d if d < 0 => Some(format!(
                    "Add {} more {} {}",
                    magnitude,
                    line.bucket.label(),
                    plural(magnitude)
                )),
                d if d > 0 => Some(format!(
                    "Remove {} {} {}",
                    magnitude,
                    line.bucket.label(),
                    plural(magnitude)
                )),
                _ => None,
            }
        })
        .collect();

    if advice.is_empty() {
        vec!["Color distribution is perfectly balanced!".to_string()]
    } else {
        advice
    }
}

/// Completion and deficit statistics for a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrunchReport {
    pub total_cards: u32,
    pub card_count: u32,
    pub completion_percent: u32,
    pub completion_ratio: f64,
    pub remaining: u32,
    pub buckets: Vec<BucketLine>,
    pub rarities: Vec<RarityLine>,
    pub warnings: Vec<TargetWarning>,
    pub recommendations: Vec<String>,
}

impl CrunchReport {
    pub fn compute<C: AccountedCard>(
        total_cards: u32,
        bucket_targets: &BucketTargets,
        rarity_targets: &RarityTargets,
        cards: &[C],
    ) -> Self {
        let mut bucket_counts: HashMap<Bucket, u32> = HashMap::new();
        let mut rarity_counts: HashMap<Rarity, u32> = HashMap::new();
        for card in cards {
            *bucket_counts.entry(classify(card.colors())).or_insert(0) += 1;
            *rarity_counts.entry(card.rarity()).or_insert(0) += 1;
        }

        let card_count = u32::try_from(cards.len()).unwrap_or(u32::MAX);

        let buckets: Vec<BucketLine> = Bucket::iter()
            .map(|bucket| {
                let target = bucket_targets.get(bucket);
                let actual = bucket_counts.get(&bucket).copied().unwrap_or(0);
                BucketLine {
                    bucket,
                    target,
                    actual,
                    delta: actual as i64 - target as i64,
                    percent_of_actual: percent_of(actual, card_count),
                }
            })
            .collect();

        let rarities = Rarity::iter()
            .map(|rarity| {
                let target = rarity_targets.get(rarity);
                let actual = rarity_counts.get(&rarity).copied().unwrap_or(0);
                RarityLine {
                    rarity,
                    target,
                    actual,
                    delta: actual as i64 - target as i64,
                    percent_of_actual: percent_of(actual, card_count),
                }
            })
            .collect();

        let recommendations = recommendations(&buckets);

        Self {
            total_cards,
            card_count,
            completion_percent: completion_percent(card_count, total_cards),
            completion_ratio: completion_ratio(card_count, total_cards),
            remaining: remaining(card_count, total_cards),
            buckets,
            rarities,
            warnings: target_warnings(total_cards, bucket_targets, rarity_targets),
            recommendations,
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketLine> {
        self.buckets.iter().find(|line| line.bucket == bucket)
    }

    pub fn rarity(&self, rarity: Rarity) -> Option<&RarityLine> {
        self.rarities.iter().find(|line| line.rarity == rarity)
    }

    pub fn is_balanced(&self) -> bool {
        self.buckets.iter().all(|line| line.delta == 0)
    }
}
