//! Deck downloads from EDHREC's deck preview endpoint, backed by the on-disk
//! deck cache.
//!
//! Cache hits never touch the rate limiter or the network. Misses are
//! fetched from `_next/data/<build id>/deckpreview/<hash>.json` and the body
//! is read from `pageProps.data.deck`. A deck that cannot be fetched is
//! logged and skipped; it never aborts the batch.

use serde_json::Value;

use crate::config;
use crate::error::Result;
use crate::models::Deck;
use crate::session::Session;

const DECK_POINTER: &str = "/pageProps/data/deck";

// ---------------------------------------------------------------------------
// DownloadProgress
// ---------------------------------------------------------------------------

/// Reported once per finished hash, in completion order.
#[derive(Debug)]
pub struct DownloadProgress<'d> {
    pub completed: usize,
    pub total: usize,
    pub hash: &'d str,
    pub deck: Option<&'d Deck>,
}

// ---------------------------------------------------------------------------
// DeckDownloader
// ---------------------------------------------------------------------------

pub struct DeckDownloader<'a> {
    session: &'a Session,
}

impl<'a> DeckDownloader<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Load one deck from cache, or download and cache it.
    ///
    /// Returns `Ok(None)` for any per-deck failure (non-success status,
    /// unexpected JSON, transport error). `Err` is reserved for build id
    /// discovery, which no deck can proceed without.
    pub fn fetch_one(&self, hash: &str) -> Result<Option<Deck>> {
        if let Some(lines) = self.session.deck_cache.get(hash) {
            tracing::debug!(hash, "deck cache hit");
            return Ok(Some(Deck::new(hash, lines)));
        }

        let build_id = self.session.build_id()?;
        let url = config::deck_preview_url(&build_id, hash);

        let resp = match self.session.edhrec_get(&url) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(hash, error = %e, "failed to fetch deck");
                return Ok(None);
            }
        };
        if !resp.is_success() {
            tracing::warn!(hash, status = resp.status, "failed to fetch deck");
            return Ok(None);
        }

        let Some(lines) = extract_deck_lines(&resp.body) else {
            tracing::warn!(hash, "deck JSON format unexpected");
            return Ok(None);
        };

        if let Err(e) = self.session.deck_cache.put(hash, &lines) {
            tracing::warn!(hash, error = %e, "failed to write deck cache entry");
        }
        Ok(Some(Deck::new(hash, lines)))
    }

    /// Fetch every hash concurrently and collect the successful decks.
    pub fn fetch_many(&self, hashes: &[String]) -> Result<Vec<Deck>> {
        self.fetch_many_with_progress(hashes, |_| {})
    }

    /// Like [`fetch_many`](Self::fetch_many), calling `on_progress` on the
    /// calling thread after each hash finishes.
    ///
    /// Each hash is attempted exactly once on a pool of at most
    /// `min(max_workers, hashes.len())` threads. Output order follows
    /// completion, not input.
    pub fn fetch_many_with_progress<F>(&self, hashes: &[String], mut on_progress: F) -> Result<Vec<Deck>>
    where
        F: FnMut(DownloadProgress<'_>),
    {
        if hashes.is_empty() {
            return Ok(Vec::new());
        }

        // Discovery failure is fatal to the batch, so surface it before
        // fanning out rather than from inside a worker.
        if hashes.iter().any(|h| !self.session.deck_cache.contains(h)) {
            self.session.build_id()?;
        }

        let total = hashes.len();
        let mut completed = 0;
        let mut decks = Vec::with_capacity(total);

        self.session.pool.run(
            hashes,
            |hash| match self.fetch_one(hash) {
                Ok(deck) => deck,
                Err(e) => {
                    tracing::warn!(hash = %hash, error = %e, "error fetching deck");
                    None
                }
            },
            |idx, deck| {
                completed += 1;
                on_progress(DownloadProgress {
                    completed,
                    total,
                    hash: &hashes[idx],
                    deck: deck.as_ref(),
                });
                if let Some(deck) = deck {
                    decks.push(deck);
                }
            },
        );

        tracing::info!(requested = total, downloaded = decks.len(), "deck download finished");
        Ok(decks)
    }
}

/// Pull the deck line array out of a deck preview payload.
pub fn extract_deck_lines(body: &str) -> Option<Vec<String>> {
    let payload: Value = serde_json::from_str(body).ok()?;
    let deck = payload.pointer(DECK_POINTER)?;
    serde_json::from_value(deck.clone()).ok()
}
