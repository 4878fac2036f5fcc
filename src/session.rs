//! Shared state for one analyzer: transport, per-service rate limiters,
//! persistent caches and the memoized build id.
//!
//! A `Session` is `Sync`; the deck downloader's worker threads borrow it
//! directly.

use crate::build_id::BuildIdResolver;
use crate::cache::{CardTypeCache, DeckCache};
use crate::config;
use crate::error::Result;
use crate::http::{HttpResponse, Transport};
use crate::pool::WorkerPool;
use crate::rate_limit::RateLimiter;
use std::sync::Arc;

pub struct Session {
    transport: Arc<dyn Transport>,
    /// Limiter for every EDHREC request (homepage, deck table, deck preview).
    pub edhrec_limiter: RateLimiter,
    /// Limiter for Scryfall card lookups.
    pub scryfall_limiter: RateLimiter,
    pub deck_cache: DeckCache,
    pub card_type_cache: CardTypeCache,
    pub build_id: BuildIdResolver,
    pub pool: WorkerPool,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        edhrec_limiter: RateLimiter,
        scryfall_limiter: RateLimiter,
        deck_cache: DeckCache,
        card_type_cache: CardTypeCache,
        build_id: BuildIdResolver,
        pool: WorkerPool,
    ) -> Self {
        Self {
            transport,
            edhrec_limiter,
            scryfall_limiter,
            deck_cache,
            card_type_cache,
            build_id,
            pool,
        }
    }

    /// Rate-limited GET against EDHREC.
    pub fn edhrec_get(&self, url: &str) -> Result<HttpResponse> {
        self.edhrec_limiter.wait();
        tracing::debug!(url, "GET");
        self.transport.get(url)
    }

    /// Rate-limited GET against Scryfall.
    pub fn scryfall_get(&self, url: &str) -> Result<HttpResponse> {
        self.scryfall_limiter.wait();
        tracing::debug!(url, "GET");
        self.transport.get(url)
    }

    /// The EDHREC build id, discovered from the homepage on first use.
    pub fn build_id(&self) -> Result<String> {
        self.build_id
            .resolve_with(|| self.edhrec_get(config::EDHREC_ROOT_URL))
    }
}
