//! Deck index for a commander, from `json.edhrec.com/pages/decks/<slug>.json`.

use crate::config;
use crate::error::{EdhrecError, Result};
use crate::models::{DeckTable, DeckTableEntry};
use crate::session::Session;

pub struct DeckTableFetcher<'a> {
    session: &'a Session,
}

impl<'a> DeckTableFetcher<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fetch every deck the index knows for `commander_slug`.
    ///
    /// One rate-limited request, no retry. A non-success status is returned
    /// as [`EdhrecError::Fetch`].
    pub fn fetch(&self, commander_slug: &str) -> Result<Vec<DeckTableEntry>> {
        let url = config::deck_table_url(commander_slug);
        let resp = self.session.edhrec_get(&url)?;
        if !resp.is_success() {
            return Err(EdhrecError::Fetch {
                url,
                status: resp.status,
            });
        }
        let table: DeckTable = resp.json()?;
        tracing::info!(slug = commander_slug, decks = table.table.len(), "fetched deck table");
        Ok(table.table)
    }
}
