//! EDHREC deck aggregation for Rust.
//!
//! Discovers the decklists EDHREC knows for a commander, downloads the most
//! recent ones inside a price window, classifies every card through Scryfall
//! and returns per-category frequency tables. Deck bodies and card type lines
//! are cached on disk, and each remote service has its own rate limiter.
//!
//! # Quick start
//!
//! ```no_run
//! use edhrec_aggregator::{EdhrecAnalyzer, RunOptions};
//!
//! let analyzer = EdhrecAnalyzer::builder().build().unwrap();
//!
//! let report = analyzer
//!     .run(&RunOptions::new("Atraxa, Praetors' Voice", 20, 200.0, 450.0))
//!     .unwrap();
//!
//! for (category, cards) in report.categories() {
//!     println!("{}: {} cards", category, cards.len());
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod aggregate;
pub mod build_id;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod models;
pub mod pool;
pub mod queries;
pub mod rate_limit;
pub mod report;
pub mod session;
pub mod slug;

#[cfg(feature = "async")]
pub use async_client::AsyncEdhrecAnalyzer;
pub use error::{EdhrecError, Result};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use report::AnalysisReport;
pub use session::Session;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::build_id::BuildIdResolver;
use crate::cache::{CardTypeCache, DeckCache};
use crate::models::{CardCounts, Deck, TypeGroups};
use crate::pool::WorkerPool;
use crate::rate_limit::RateLimiter;

// ---------------------------------------------------------------------------
// RunOptions
// ---------------------------------------------------------------------------

/// Parameters of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Commander display name, e.g. `"Atraxa, Praetors' Voice"`.
    pub commander: String,
    /// Maximum number of decks to analyze.
    pub limit: usize,
    pub min_price: f64,
    pub max_price: f64,
}

impl RunOptions {
    pub fn new(commander: impl Into<String>, limit: usize, min_price: f64, max_price: f64) -> Self {
        Self {
            commander: commander.into(),
            limit,
            min_price,
            max_price,
        }
    }

    pub fn slug(&self) -> String {
        slug::commander_slug(&self.commander)
    }

    fn validate(&self) -> Result<()> {
        if self.slug().is_empty() {
            return Err(EdhrecError::InvalidArgument(format!(
                "commander name {:?} has no usable characters",
                self.commander
            )));
        }
        if self.min_price.is_nan() || self.max_price.is_nan() {
            return Err(EdhrecError::InvalidArgument("price bounds must be numbers".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EdhrecAnalyzerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`EdhrecAnalyzer`].
///
/// Use [`EdhrecAnalyzer::builder()`] to obtain one.
pub struct EdhrecAnalyzerBuilder {
    cache_dir: Option<PathBuf>,
    timeout: Duration,
    edhrec_delay: Duration,
    scryfall_delay: Duration,
    max_workers: usize,
    transport: Option<Arc<dyn Transport>>,
    build_id: Option<String>,
}

impl Default for EdhrecAnalyzerBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            timeout: config::DEFAULT_TIMEOUT,
            edhrec_delay: config::EDHREC_MIN_DELAY,
            scryfall_delay: config::SCRYFALL_MIN_DELAY,
            max_workers: config::DEFAULT_MAX_WORKERS,
            transport: None,
            build_id: None,
        }
    }
}

impl EdhrecAnalyzerBuilder {
    /// Set a custom cache directory.
    ///
    /// Defaults to the platform cache directory (e.g.
    /// `~/.cache/edhrec-aggregator` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// HTTP client timeout for the default transport. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum spacing between EDHREC requests. Defaults to 800ms.
    pub fn edhrec_delay(mut self, delay: Duration) -> Self {
        self.edhrec_delay = delay;
        self
    }

    /// Minimum spacing between Scryfall requests. Defaults to 120ms.
    pub fn scryfall_delay(mut self, delay: Duration) -> Self {
        self.scryfall_delay = delay;
        self
    }

    /// Upper bound on concurrent deck downloads. Defaults to 5; 0 is treated
    /// as 1.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a known build id instead of scraping the homepage.
    pub fn build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }

    /// Open the caches and build the analyzer. No network I/O happens here.
    pub fn build(self) -> Result<EdhrecAnalyzer> {
        let cache_dir = self.cache_dir.unwrap_or_else(config::default_cache_dir);
        let (deck_dir, card_type_path) = cache::cache_paths(&cache_dir);
        let deck_cache = DeckCache::open(deck_dir)?;
        let card_type_cache = CardTypeCache::open(card_type_path)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(self.timeout)?),
        };
        let build_id = match self.build_id {
            Some(id) => BuildIdResolver::with_build_id(id),
            None => BuildIdResolver::new(),
        };

        let session = Session::new(
            transport,
            RateLimiter::new("edhrec", self.edhrec_delay),
            RateLimiter::new("scryfall", self.scryfall_delay),
            deck_cache,
            card_type_cache,
            build_id,
            WorkerPool::new(self.max_workers),
        );
        Ok(EdhrecAnalyzer { cache_dir, session })
    }
}

// ---------------------------------------------------------------------------
// EdhrecAnalyzer
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns a [`Session`] and exposes each pipeline stage as a lightweight
/// borrowing wrapper, plus [`run`](Self::run) for the whole pipeline.
pub struct EdhrecAnalyzer {
    cache_dir: PathBuf,
    session: Session,
}

impl EdhrecAnalyzer {
    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> EdhrecAnalyzerBuilder {
        EdhrecAnalyzerBuilder::default()
    }

    // -- Stage accessors ---------------------------------------------------

    /// Deck index lookups for a commander slug.
    pub fn deck_table(&self) -> queries::DeckTableFetcher<'_> {
        queries::DeckTableFetcher::new(&self.session)
    }

    /// Cached, concurrent deck downloads.
    pub fn decks(&self) -> queries::DeckDownloader<'_> {
        queries::DeckDownloader::new(&self.session)
    }

    /// Card type resolution and classification.
    pub fn card_types(&self) -> queries::CardTypeResolver<'_> {
        queries::CardTypeResolver::new(&self.session)
    }

    /// The EDHREC build id, discovered on first call and memoized.
    pub fn build_id(&self) -> Result<String> {
        self.session.build_id()
    }

    // -- Pure stages -------------------------------------------------------

    /// Sum card quantities across `decks`.
    pub fn count(&self, decks: &[Deck]) -> CardCounts {
        aggregate::count_cards(decks)
    }

    /// Partition card counts into type buckets via Scryfall.
    pub fn classify(&self, counts: &CardCounts) -> TypeGroups {
        self.card_types().classify(counts)
    }

    // -- Pipeline ----------------------------------------------------------

    /// Run the full pipeline: build id, deck table, selection, downloads,
    /// counting and classification.
    ///
    /// Aborts on build id discovery or deck table failure. Individual decks
    /// and card lookups that fail are dropped or classified as unknown.
    pub fn run(&self, options: &RunOptions) -> Result<AnalysisReport> {
        self.run_with_progress(options, |_| {})
    }

    /// [`run`](Self::run) with a per-deck download progress callback.
    pub fn run_with_progress<F>(&self, options: &RunOptions, on_progress: F) -> Result<AnalysisReport>
    where
        F: FnMut(queries::DownloadProgress<'_>),
    {
        options.validate()?;
        let slug = options.slug();

        let build_id = self.build_id()?;
        tracing::debug!(build_id = %build_id, "using build id");

        let entries = self.deck_table().fetch(&slug)?;
        let hashes = filter::select_hashes(&entries, options.limit, options.min_price, options.max_price);
        tracing::info!(selected = hashes.len(), "using deck hashes");

        let decks = self.decks().fetch_many_with_progress(&hashes, on_progress)?;
        let card_counts = self.count(&decks);
        let type_groups = self.classify(&card_counts);

        Ok(AnalysisReport {
            options: options.clone(),
            slug,
            selected: hashes.len(),
            decks,
            card_counts,
            type_groups,
        })
    }

    // -- Accessors ---------------------------------------------------------

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Return a reference to the underlying [`Session`] for advanced usage.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl fmt::Display for EdhrecAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EdhrecAnalyzer(cache_dir={}, max_workers={}, build_id={})",
            self.cache_dir.display(),
            self.session.pool.max_workers(),
            self.session.build_id.cached().as_deref().unwrap_or("<unresolved>")
        )
    }
}
