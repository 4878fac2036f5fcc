//! Shared test fixtures for the EDHREC aggregator integration tests.
//!
//! Provides a `MockTransport` serving canned responses by URL and counting
//! calls and peak concurrency, plus `setup_analyzer()` which builds an
//! analyzer over a temporary cache directory with no rate-limit delays.

#![allow(dead_code)]

use edhrec_aggregator::{EdhrecAnalyzer, HttpResponse, Result, Transport};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const BUILD_ID: &str = "abcDEF12345";

pub const HOMEPAGE: &str = r#"<html><head>
<script src="/_next/static/chunks/main-1234.js" defer></script>
<script src="/_next/static/abcDEF12345/_buildManifest.js" defer></script>
<script src="/_next/static/abcDEF12345/_ssgManifest.js" defer></script>
</head><body></body></html>"#;

/// Transport answering from a URL -> response table. Unknown URLs get 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, HttpResponse>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sleeps for `latency` so overlapping calls are visible.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn route(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), HttpResponse::new(status, body));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.contains(needle))
            .count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(url.to_string());
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let resp = self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, r#"{"object":"error"}"#));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(resp)
    }
}

pub fn deck_table_url(slug: &str) -> String {
    format!("https://json.edhrec.com/pages/decks/{}.json", slug)
}

pub fn deck_url(hash: &str) -> String {
    format!(
        "https://edhrec.com/_next/data/{}/deckpreview/{}.json?deckId={}",
        BUILD_ID, hash, hash
    )
}

pub fn scryfall_url(name: &str) -> String {
    edhrec_aggregator::queries::card_types::named_url(name).unwrap()
}

pub fn deck_body(lines: &[&str]) -> String {
    serde_json::json!({ "pageProps": { "data": { "deck": lines } } }).to_string()
}

pub fn card_body(type_line: &str) -> String {
    serde_json::json!({ "object": "card", "type_line": type_line }).to_string()
}

/// Route a deck preview for `hash` returning `lines`.
pub fn route_deck(transport: &MockTransport, hash: &str, lines: &[&str]) {
    transport.route(deck_url(hash), 200, deck_body(lines));
}

/// Build an analyzer over `cache_dir` with zero delays and the mock transport.
pub fn analyzer_with(
    transport: Arc<MockTransport>,
    cache_dir: &std::path::Path,
    max_workers: usize,
) -> EdhrecAnalyzer {
    EdhrecAnalyzer::builder()
        .cache_dir(cache_dir)
        .edhrec_delay(Duration::ZERO)
        .scryfall_delay(Duration::ZERO)
        .max_workers(max_workers)
        .transport(transport)
        .build()
        .unwrap()
}

/// Analyzer with a fresh temp cache and a transport that already serves the
/// homepage. Keep the `TempDir` alive for the duration of the test.
pub fn setup_analyzer() -> (EdhrecAnalyzer, Arc<MockTransport>, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.route("https://edhrec.com", 200, HOMEPAGE);
    let analyzer = analyzer_with(transport.clone(), tmp_dir.path(), 5);
    (analyzer, transport, tmp_dir)
}
