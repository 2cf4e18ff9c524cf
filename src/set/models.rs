use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distribution::{crunch, BucketTargets, RarityTargets, TargetWarning};

/// Stored record for a custom set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_cards: u32,
    #[serde(flatten)]
    pub bucket_targets: BucketTargets,
    #[serde(flatten)]
    pub rarity_targets: RarityTargets,
}

impl SetModel {
    /// Target sums that disagree with `total_cards`
    pub fn warnings(&self) -> Vec<TargetWarning> {
        crunch::target_warnings(self.total_cards, &self.bucket_targets, &self.rarity_targets)
    }

    /// Refreshes the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A set that has not been stored yet; the repository assigns id and
/// timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub name: String,
    pub description: String,
    pub total_cards: u32,
    pub bucket_targets: BucketTargets,
    pub rarity_targets: RarityTargets,
}

impl NewSet {
    pub fn into_model(self, id: i64, now: DateTime<Utc>) -> SetModel {
        SetModel {
            id,
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
            total_cards: self.total_cards,
            bucket_targets: self.bucket_targets,
            rarity_targets: self.rarity_targets,
        }
    }
}
