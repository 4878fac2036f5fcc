//! Async wrapper around [`EdhrecAnalyzer`] for use in async runtimes (Tokio, etc.).
//!
//! The pipeline is blocking I/O with rate-limit sleeps, so every operation is
//! dispatched to [`tokio::task::spawn_blocking`], keeping the event loop free.
//!
//! # Example
//!
//! ```no_run
//! use edhrec_aggregator::{AsyncEdhrecAnalyzer, RunOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let analyzer = AsyncEdhrecAnalyzer::builder().build().await.unwrap();
//!
//!     let report = analyzer
//!         .analyze(RunOptions::new("Atraxa, Praetors' Voice", 20, 200.0, 450.0))
//!         .await
//!         .unwrap();
//!
//!     // Run any sync stage via closure
//!     let type_line = analyzer.run(|a| Ok(a.card_types().type_of("Sol Ring"))).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{EdhrecError, Result};
use crate::report::AnalysisReport;
use crate::{EdhrecAnalyzer, RunOptions};

// ---------------------------------------------------------------------------
// AsyncEdhrecAnalyzerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncEdhrecAnalyzer`].
pub struct AsyncEdhrecAnalyzerBuilder {
    cache_dir: Option<PathBuf>,
    timeout: Duration,
    max_workers: Option<usize>,
}

impl Default for AsyncEdhrecAnalyzerBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            timeout: crate::config::DEFAULT_TIMEOUT,
            max_workers: None,
        }
    }
}

impl AsyncEdhrecAnalyzerBuilder {
    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound on concurrent deck downloads.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    /// Build the analyzer on the blocking pool (opening the caches touches
    /// the filesystem).
    pub async fn build(self) -> Result<AsyncEdhrecAnalyzer> {
        tokio::task::spawn_blocking(move || {
            let mut builder = EdhrecAnalyzer::builder().timeout(self.timeout);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(workers) = self.max_workers {
                builder = builder.max_workers(workers);
            }
            Ok(AsyncEdhrecAnalyzer::from_analyzer(builder.build()?))
        })
        .await
        .map_err(|e| EdhrecError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncEdhrecAnalyzer
// ---------------------------------------------------------------------------

/// Async wrapper around [`EdhrecAnalyzer`].
///
/// The analyzer is internally synchronized, so it is shared behind an
/// [`Arc`] without an outer lock.
#[derive(Clone)]
pub struct AsyncEdhrecAnalyzer {
    inner: Arc<EdhrecAnalyzer>,
}

impl AsyncEdhrecAnalyzer {
    /// Create a new builder for configuring the async analyzer.
    pub fn builder() -> AsyncEdhrecAnalyzerBuilder {
        AsyncEdhrecAnalyzerBuilder::default()
    }

    /// Wrap an already configured analyzer.
    pub fn from_analyzer(analyzer: EdhrecAnalyzer) -> Self {
        Self {
            inner: Arc::new(analyzer),
        }
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&EdhrecAnalyzer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let analyzer = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&analyzer))
            .await
            .map_err(|e| EdhrecError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Run the full pipeline asynchronously.
    pub async fn analyze(&self, options: RunOptions) -> Result<AnalysisReport> {
        self.run(move |a| a.run(&options)).await
    }

    /// Resolve the EDHREC build id asynchronously.
    pub async fn build_id(&self) -> Result<String> {
        self.run(|a| a.build_id()).await
    }
}
