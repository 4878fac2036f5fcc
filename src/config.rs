use std::path::PathBuf;
use std::time::Duration;

pub const EDHREC_ROOT_URL: &str = "https://edhrec.com";
pub const DECK_TABLE_BASE: &str = "https://json.edhrec.com/pages/decks";
pub const DECK_PREVIEW_BASE: &str = "https://edhrec.com/_next/data";
pub const SCRYFALL_NAMED_URL: &str = "https://api.scryfall.com/cards/named";

/// Minimum spacing between two EDHREC requests.
pub const EDHREC_MIN_DELAY: Duration = Duration::from_millis(800);
/// Scryfall asks for 50-100ms between requests; stay slightly above.
pub const SCRYFALL_MIN_DELAY: Duration = Duration::from_millis(120);

pub const DEFAULT_MAX_WORKERS: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const DECK_CACHE_SUBDIR: &str = "deck_cache";
pub const CARD_TYPE_CACHE_FILE: &str = "scryfall_cache.json";

pub const USER_AGENT: &str = concat!("edhrec-aggregator/", env!("CARGO_PKG_VERSION"));

pub fn deck_table_url(slug: &str) -> String {
    format!("{}/{}.json", DECK_TABLE_BASE, slug)
}

pub fn deck_preview_url(build_id: &str, hash: &str) -> String {
    format!(
        "{}/{}/deckpreview/{}.json?deckId={}",
        DECK_PREVIEW_BASE, build_id, hash, hash
    )
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("edhrec-aggregator")
    } else {
        PathBuf::from(".edhrec-cache")
    }
}
