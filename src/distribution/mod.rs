//! Set distribution accounting.
//!
//! Pure functions over a set's targets and its current card list: bucket
//! layout, slot assignment, completion statistics and the grid projection.
//! Nothing here is cached; callers recompute on every read.

pub mod crunch;
pub mod projection;
pub mod schema;
pub mod slots;

pub use crunch::{CrunchReport, TargetWarning};
pub use projection::{
    project, CardFilter, GridEntry, Projection, SortDirection, SortKey, ViewConfig,
};
pub use schema::{Bucket, BucketTargets, Color, Rarity, RarityTargets, SlotRange};
pub use slots::{classify, expected_bucket_at, SlotAssigner, SlotPosition};

use chrono::{DateTime, Utc};

/// Read access to the card fields the accounting model looks at
pub trait AccountedCard {
    fn id(&self) -> i64;
    fn colors(&self) -> &[Color];
    fn rarity(&self) -> Rarity;
    fn name(&self) -> &str;
    fn type_line(&self) -> &str;
    fn mana_cost(&self) -> &str;
    fn archetype_id(&self) -> Option<i64>;
    fn created_at(&self) -> DateTime<Utc>;
}
