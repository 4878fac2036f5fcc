use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DeckTableEntry — One deck known to the EDHREC index for a commander
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckTableEntry {
    #[serde(rename = "urlhash")]
    pub url_hash: String,
    #[serde(rename = "savedate")]
    pub save_date: NaiveDate,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// DeckTable — Body of `pages/decks/<slug>.json`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckTable {
    #[serde(default)]
    pub table: Vec<DeckTableEntry>,
}

// ---------------------------------------------------------------------------
// Deck — A downloaded decklist
// ---------------------------------------------------------------------------

/// One user-submitted decklist. Each line reads `"<quantity> <card name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub url_hash: String,
    pub lines: Vec<String>,
}

impl Deck {
    pub fn new(url_hash: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            url_hash: url_hash.into(),
            lines,
        }
    }
}
