//! Deck downloads: caching, failure isolation and bounded concurrency.

mod common;

use common::MockTransport;
use edhrec_aggregator::queries::decks::extract_deck_lines;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn hashes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("deck{:02}", i)).collect()
}

// ---------------------------------------------------------------------------
// fetch_one
// ---------------------------------------------------------------------------

#[test]
fn fetch_one_downloads_and_caches() {
    let (analyzer, transport, tmp) = common::setup_analyzer();
    common::route_deck(&transport, "h1", &["1 Sol Ring", "1 Command Tower"]);

    let deck = analyzer.decks().fetch_one("h1").unwrap().unwrap();
    assert_eq!(deck.url_hash, "h1");
    assert_eq!(deck.lines, ["1 Sol Ring", "1 Command Tower"]);
    assert!(tmp.path().join("deck_cache/h1.json").is_file());
}

#[test]
fn cached_deck_needs_no_network() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    common::route_deck(&transport, "h1", &["1 Sol Ring", "3 Plains"]);

    let first = analyzer.decks().fetch_one("h1").unwrap().unwrap();
    let calls_after_first = transport.call_count();
    assert!(calls_after_first > 0);

    let second = analyzer.decks().fetch_one("h1").unwrap().unwrap();
    assert_eq!(transport.call_count() - calls_after_first, 0);
    assert_eq!(first, second);
}

#[test]
fn cache_survives_a_new_analyzer() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.route("https://edhrec.com", 200, common::HOMEPAGE);
    common::route_deck(&transport, "h1", &["1 Sol Ring"]);
    let analyzer = common::analyzer_with(transport, tmp.path(), 5);
    analyzer.decks().fetch_one("h1").unwrap().unwrap();
    drop(analyzer);

    // Second "run": nothing is routed, not even the homepage.
    let offline = Arc::new(MockTransport::new());
    let analyzer = common::analyzer_with(offline.clone(), tmp.path(), 5);
    let deck = analyzer.decks().fetch_one("h1").unwrap().unwrap();
    assert_eq!(deck.lines, ["1 Sol Ring"]);
    assert_eq!(offline.call_count(), 0);
}

#[test]
fn http_failure_is_absent_not_error() {
    let (analyzer, transport, tmp) = common::setup_analyzer();
    transport.route(common::deck_url("gone"), 404, "not found");

    assert!(analyzer.decks().fetch_one("gone").unwrap().is_none());
    assert!(!tmp.path().join("deck_cache/gone.json").exists());
}

#[test]
fn unexpected_json_is_absent() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    transport.route(common::deck_url("odd"), 200, r#"{"pageProps":{"data":{}}}"#);
    transport.route(common::deck_url("html"), 200, "<html>oops</html>");

    assert!(analyzer.decks().fetch_one("odd").unwrap().is_none());
    assert!(analyzer.decks().fetch_one("html").unwrap().is_none());
}

#[test]
fn extract_reads_page_props_path() {
    let body = common::deck_body(&["1 Sol Ring"]);
    assert_eq!(extract_deck_lines(&body).unwrap(), ["1 Sol Ring"]);
    assert!(extract_deck_lines(r#"{"deck":["1 Sol Ring"]}"#).is_none());
}

// ---------------------------------------------------------------------------
// fetch_many
// ---------------------------------------------------------------------------

#[test]
fn fetch_many_collects_successes_only() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    let all = hashes(8);
    for (i, h) in all.iter().enumerate() {
        if i % 3 != 0 {
            common::route_deck(&transport, h, &["1 Sol Ring"]);
        }
    }

    let decks = analyzer.decks().fetch_many(&all).unwrap();
    assert_eq!(decks.len(), 5);

    // Each hash attempted exactly once.
    for h in &all {
        assert_eq!(transport.calls_matching(&format!("deckId={}", h)), 1, "{}", h);
    }
    let got: HashSet<&str> = decks.iter().map(|d| d.url_hash.as_str()).collect();
    assert_eq!(got.len(), decks.len());
}

#[test]
fn fetch_many_empty_input_does_nothing() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    assert!(analyzer.decks().fetch_many(&[]).unwrap().is_empty());
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn fetch_many_fails_when_build_id_cannot_be_found() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    transport.route("https://edhrec.com", 200, "<html>no scripts</html>");
    let analyzer = common::analyzer_with(transport.clone(), tmp.path(), 5);

    let err = analyzer.decks().fetch_many(&hashes(3)).unwrap_err();
    assert!(matches!(err, edhrec_aggregator::EdhrecError::Discovery(_)));
    assert_eq!(transport.calls_matching("deckpreview"), 0);
}

#[test]
fn fetch_many_all_cached_skips_discovery() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new());
    let analyzer = common::analyzer_with(transport.clone(), tmp.path(), 5);
    for h in hashes(3) {
        analyzer.session().deck_cache.put(&h, &["1 Island".to_string()]).unwrap();
    }

    let decks = analyzer.decks().fetch_many(&hashes(3)).unwrap();
    assert_eq!(decks.len(), 3);
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn corrupt_cache_entry_is_downloaded_again() {
    let (analyzer, transport, tmp) = common::setup_analyzer();
    common::route_deck(&transport, "h1", &["1 Sol Ring"]);
    std::fs::write(tmp.path().join("deck_cache/h1.json"), "[\"1 Sol").unwrap();

    let decks = analyzer.decks().fetch_many(&["h1".to_string()]).unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].lines, ["1 Sol Ring"]);
    assert_eq!(transport.calls_matching("deckpreview"), 1);
    assert_eq!(analyzer.session().deck_cache.get("h1").unwrap(), ["1 Sol Ring"]);
}

#[test]
fn dotted_hash_is_cached_like_any_other() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    common::route_deck(&transport, ".h1", &["1 Sol Ring"]);

    analyzer.decks().fetch_one(".h1").unwrap().unwrap();
    analyzer.decks().fetch_one(".h1").unwrap().unwrap();
    assert_eq!(transport.calls_matching("deckpreview"), 1);
}

#[test]
fn at_most_five_requests_in_flight() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::with_latency(Duration::from_millis(20)));
    transport.route("https://edhrec.com", 200, common::HOMEPAGE);
    let all = hashes(20);
    for h in &all {
        common::route_deck(&transport, h, &["1 Sol Ring"]);
    }
    let analyzer = common::analyzer_with(transport.clone(), tmp.path(), 5);

    let decks = analyzer.decks().fetch_many(&all).unwrap();
    assert_eq!(decks.len(), 20);
    assert!(transport.peak_in_flight() <= 5, "peak {}", transport.peak_in_flight());
}

#[test]
fn single_worker_serializes_requests() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::with_latency(Duration::from_millis(5)));
    transport.route("https://edhrec.com", 200, common::HOMEPAGE);
    let all = hashes(6);
    for h in &all {
        common::route_deck(&transport, h, &["1 Sol Ring"]);
    }
    let analyzer = common::analyzer_with(transport.clone(), tmp.path(), 1);

    assert_eq!(analyzer.decks().fetch_many(&all).unwrap().len(), 6);
    assert_eq!(transport.peak_in_flight(), 1);
}

#[test]
fn progress_reports_every_hash() {
    let (analyzer, transport, _tmp) = common::setup_analyzer();
    let all = hashes(4);
    common::route_deck(&transport, &all[0], &["1 Sol Ring"]);
    common::route_deck(&transport, &all[2], &["1 Sol Ring"]);

    let mut seen = Vec::new();
    let decks = analyzer
        .decks()
        .fetch_many_with_progress(&all, |p| {
            assert_eq!(p.total, 4);
            seen.push((p.completed, p.hash.to_string(), p.deck.is_some()));
        })
        .unwrap();

    assert_eq!(decks.len(), 2);
    let completed: Vec<usize> = seen.iter().map(|s| s.0).collect();
    assert_eq!(completed, [1, 2, 3, 4]);
    let reported: HashSet<String> = seen.iter().map(|s| s.1.clone()).collect();
    assert_eq!(reported.len(), 4);
    assert_eq!(seen.iter().filter(|s| s.2).count(), 2);
}
