use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// One of the five colors a card can carry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// Mana symbol letter used in costs and archetype color pairs
    pub fn symbol(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

/// The nine color/type categories a set's target card count is split into.
///
/// Declaration order is the order slot ranges are laid out in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Bucket {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Multicolor,
    Lands,
    BasicLands,
}

impl Bucket {
    /// Human readable name, used in recommendation lines
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::White => "white",
            Bucket::Blue => "blue",
            Bucket::Black => "black",
            Bucket::Red => "red",
            Bucket::Green => "green",
            Bucket::Colorless => "colorless",
            Bucket::Multicolor => "multicolor",
            Bucket::Lands => "lands",
            Bucket::BasicLands => "basic lands",
        }
    }
}

impl From<Color> for Bucket {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Bucket::White,
            Color::Blue => Bucket::Blue,
            Color::Black => Bucket::Black,
            Color::Red => Bucket::Red,
            Color::Green => Bucket::Green,
        }
    }
}

/// Card rarity, ordered by severity (common < uncommon < rare < mythic)
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Mythic,
}

/// Target card count per bucket.
///
/// Field names match the set record's wire format so this struct can be
/// flattened into request and response bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTargets {
    #[serde(default)]
    pub white_cards: u32,
    #[serde(default)]
    pub blue_cards: u32,
    #[serde(default)]
    pub black_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub green_cards: u32,
    #[serde(default)]
    pub colorless_cards: u32,
    #[serde(default)]
    pub multicolor_cards: u32,
    #[serde(default)]
    pub lands_cards: u32,
    #[serde(default)]
    pub basic_lands_cards: u32,
}

impl BucketTargets {
    pub fn get(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::White => self.white_cards,
            Bucket::Blue => self.blue_cards,
            Bucket::Black => self.black_cards,
            Bucket::Red => self.red_cards,
            Bucket::Green => self.green_cards,
            Bucket::Colorless => self.colorless_cards,
            Bucket::Multicolor => self.multicolor_cards,
            Bucket::Lands => self.lands_cards,
            Bucket::BasicLands => self.basic_lands_cards,
        }
    }

    pub fn set(&mut self, bucket: Bucket, value: u32) {
        let slot = match bucket {
            Bucket::White => &mut self.white_cards,
            Bucket::Blue => &mut self.blue_cards,
            Bucket::Black => &mut self.black_cards,
            Bucket::Red => &mut self.red_cards,
            Bucket::Green => &mut self.green_cards,
            Bucket::Colorless => &mut self.colorless_cards,
            Bucket::Multicolor => &mut self.multicolor_cards,
            Bucket::Lands => &mut self.lands_cards,
            Bucket::BasicLands => &mut self.basic_lands_cards,
        };
        *slot = value;
    }

    /// Sum of all nine targets, saturating
    pub fn sum(&self) -> u32 {
        Bucket::iter().fold(0u32, |acc, b| acc.saturating_add(self.get(b)))
    }

    /// Lays the nonzero buckets out as contiguous 1-based ranges in schema
    /// order. Zero-target buckets get no range at all.
    pub fn slot_ranges(&self) -> Vec<SlotRange> {
        let mut cursor = 1u32;
        let mut ranges = Vec::new();

        for bucket in Bucket::iter() {
            let target = self.get(bucket);
            if target == 0 {
                continue;
            }
            let end = cursor.saturating_add(target - 1);
            ranges.push(SlotRange {
                bucket,
                start: cursor,
                end,
            });
            cursor = end.saturating_add(1);
        }

        ranges
    }
}

/// Target card count per rarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityTargets {
    #[serde(default)]
    pub common_cards: u32,
    #[serde(default)]
    pub uncommon_cards: u32,
    #[serde(default)]
    pub rare_cards: u32,
    #[serde(default)]
    pub mythic_cards: u32,
}

impl RarityTargets {
    pub fn get(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common_cards,
            Rarity::Uncommon => self.uncommon_cards,
            Rarity::Rare => self.rare_cards,
            Rarity::Mythic => self.mythic_cards,
        }
    }

    pub fn sum(&self) -> u32 {
        Rarity::iter().fold(0u32, |acc, r| acc.saturating_add(self.get(r)))
    }
}

/// Inclusive 1-based range of grid positions reserved for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRange {
    pub bucket: Bucket,
    pub start: u32,
    pub end: u32,
}

impl SlotRange {
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, position: u32) -> bool {
        position >= self.start && position <= self.end
    }
}
