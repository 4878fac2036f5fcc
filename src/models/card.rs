use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Type line stored for cards the card database could not resolve.
pub const UNKNOWN_TYPE_LINE: &str = "Unknown";

/// Card name to cumulative quantity across all processed decks.
pub type CardCounts = HashMap<String, i64>;

// ---------------------------------------------------------------------------
// CardCategory — Fixed, ordered report buckets
// ---------------------------------------------------------------------------

/// Report buckets in match priority order. A type line belongs to the first
/// category whose label is a substring of it; `Unknown` catches the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Creature,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Planeswalker,
    Battle,
    Land,
    Unknown,
}

impl CardCategory {
    pub const ALL: [CardCategory; 9] = [
        CardCategory::Creature,
        CardCategory::Instant,
        CardCategory::Sorcery,
        CardCategory::Artifact,
        CardCategory::Enchantment,
        CardCategory::Planeswalker,
        CardCategory::Battle,
        CardCategory::Land,
        CardCategory::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardCategory::Creature => "Creature",
            CardCategory::Instant => "Instant",
            CardCategory::Sorcery => "Sorcery",
            CardCategory::Artifact => "Artifact",
            CardCategory::Enchantment => "Enchantment",
            CardCategory::Planeswalker => "Planeswalker",
            CardCategory::Battle => "Battle",
            CardCategory::Land => "Land",
            CardCategory::Unknown => "Unknown",
        }
    }

    /// Bucket for a type line such as `"Legendary Creature — Human Wizard"`.
    pub fn from_type_line(type_line: &str) -> CardCategory {
        Self::ALL
            .iter()
            .copied()
            .filter(|c| *c != CardCategory::Unknown)
            .find(|c| type_line.contains(c.label()))
            .unwrap_or(CardCategory::Unknown)
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// TypeGroups — Card counts partitioned by category
// ---------------------------------------------------------------------------

/// Every category is always present, possibly empty; iteration follows the
/// fixed category order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGroups {
    groups: BTreeMap<CardCategory, CardCounts>,
}

impl Default for TypeGroups {
    fn default() -> Self {
        Self {
            groups: CardCategory::ALL
                .iter()
                .map(|c| (*c, CardCounts::new()))
                .collect(),
        }
    }
}

impl TypeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: CardCategory, card: impl Into<String>, count: i64) {
        self.groups
            .entry(category)
            .or_default()
            .insert(card.into(), count);
    }

    pub fn get(&self, category: CardCategory) -> &CardCounts {
        // Default populates every category.
        &self.groups[&category]
    }

    /// Category of `card`, if it was classified.
    pub fn category_of(&self, card: &str) -> Option<CardCategory> {
        self.groups
            .iter()
            .find(|(_, cards)| cards.contains_key(card))
            .map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardCategory, &CardCounts)> {
        self.groups.iter().map(|(c, cards)| (*c, cards))
    }

    /// Total number of distinct cards across all categories.
    pub fn card_count(&self) -> usize {
        self.groups.values().map(|cards| cards.len()).sum()
    }
}
