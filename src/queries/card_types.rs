//! Card type lookups against Scryfall's exact-name endpoint.

use serde::Deserialize;

use crate::config;
use crate::error::{EdhrecError, Result};
use crate::models::{CardCategory, CardCounts, TypeGroups, UNKNOWN_TYPE_LINE};
use crate::session::Session;

#[derive(Debug, Deserialize)]
struct NamedCard {
    type_line: Option<String>,
}

/// Resolves card names to type lines through the persistent card type cache.
///
/// Lookups are sequential and rate-limited. A lookup answered with a failure
/// status is cached as [`UNKNOWN_TYPE_LINE`] and never retried, in this run
/// or later ones. A transport error also yields `Unknown` but is not cached.
pub struct CardTypeResolver<'a> {
    session: &'a Session,
}

impl<'a> CardTypeResolver<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Type line for `card_name`, e.g. `"Legendary Creature — Elf Druid"`.
    pub fn type_of(&self, card_name: &str) -> String {
        if let Some(type_line) = self.session.card_type_cache.get(card_name) {
            return type_line;
        }

        let Some(type_line) = self.lookup(card_name) else {
            // Transport failure: answer Unknown for this run only.
            return UNKNOWN_TYPE_LINE.to_string();
        };
        tracing::debug!(card = card_name, type_line = %type_line, "resolved card type");
        match self.session.card_type_cache.put(card_name, &type_line) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(card = card_name, error = %e, "failed to persist card type cache");
                type_line
            }
        }
    }

    /// Ask Scryfall for the type line. `None` means the request never got an
    /// answer and the result must not be cached; a non-success status or a
    /// payload without `type_line` yields [`UNKNOWN_TYPE_LINE`].
    fn lookup(&self, card_name: &str) -> Option<String> {
        let url = match named_url(card_name) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(card = card_name, error = %e, "could not build lookup URL");
                return None;
            }
        };
        let resp = match self.session.scryfall_get(&url) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(card = card_name, error = %e, "card lookup failed; not caching");
                return None;
            }
        };
        if !resp.is_success() {
            tracing::warn!(card = card_name, status = resp.status, "card lookup failed");
            return Some(UNKNOWN_TYPE_LINE.to_string());
        }
        let type_line = resp
            .json::<NamedCard>()
            .ok()
            .and_then(|card| card.type_line)
            .unwrap_or_else(|| UNKNOWN_TYPE_LINE.to_string());
        Some(type_line)
    }

    /// Partition `counts` into the fixed category buckets.
    ///
    /// Cards are resolved one at a time on the calling thread.
    pub fn classify(&self, counts: &CardCounts) -> TypeGroups {
        let mut names: Vec<&String> = counts.keys().collect();
        names.sort();

        let mut groups = TypeGroups::new();
        for name in names {
            let type_line = self.type_of(name);
            groups.insert(CardCategory::from_type_line(&type_line), name.as_str(), counts[name]);
        }
        tracing::info!(cards = groups.card_count(), "classified card types");
        groups
    }
}

/// `cards/named?exact=<name>` with the name query-encoded.
pub fn named_url(card_name: &str) -> Result<String> {
    reqwest::Url::parse_with_params(config::SCRYFALL_NAMED_URL, &[("exact", card_name)])
        .map(String::from)
        .map_err(|e| EdhrecError::InvalidArgument(format!("bad lookup URL for {:?}: {}", card_name, e)))
}
