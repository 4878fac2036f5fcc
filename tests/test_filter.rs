//! Deck selection: price window, recency ordering and truncation.

use chrono::NaiveDate;
use edhrec_aggregator::filter::select_hashes;
use edhrec_aggregator::models::{DeckTable, DeckTableEntry};

fn entry(hash: &str, date: &str, price: f64) -> DeckTableEntry {
    DeckTableEntry {
        url_hash: hash.to_string(),
        save_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        price,
    }
}

// ---------------------------------------------------------------------------
// ordering
// ---------------------------------------------------------------------------

#[test]
fn most_recent_first() {
    let entries = vec![
        entry("jan", "2024-01-01", 300.0),
        entry("mar", "2024-03-01", 300.0),
        entry("feb", "2024-02-01", 300.0),
    ];
    assert_eq!(select_hashes(&entries, 10, 0.0, 1000.0), ["mar", "feb", "jan"]);
}

#[test]
fn equal_dates_keep_index_order() {
    let entries = vec![
        entry("a", "2024-05-01", 100.0),
        entry("b", "2024-06-01", 100.0),
        entry("c", "2024-05-01", 100.0),
        entry("d", "2024-05-01", 100.0),
    ];
    assert_eq!(select_hashes(&entries, 10, 0.0, 1000.0), ["b", "a", "c", "d"]);
}

// ---------------------------------------------------------------------------
// price window
// ---------------------------------------------------------------------------

#[test]
fn price_bounds_are_inclusive() {
    let entries = vec![
        entry("low", "2024-01-01", 199.99),
        entry("min", "2024-01-02", 200.0),
        entry("mid", "2024-01-03", 300.0),
        entry("max", "2024-01-04", 450.0),
        entry("high", "2024-01-05", 450.01),
    ];
    assert_eq!(select_hashes(&entries, 10, 200.0, 450.0), ["max", "mid", "min"]);
}

#[test]
fn empty_window_selects_nothing() {
    let entries = vec![entry("a", "2024-01-01", 100.0)];
    assert!(select_hashes(&entries, 10, 500.0, 400.0).is_empty());
}

// ---------------------------------------------------------------------------
// truncation
// ---------------------------------------------------------------------------

#[test]
fn truncates_after_filtering() {
    // The newest deck is over budget, so the limit applies to the rest.
    let entries = vec![
        entry("pricey", "2024-09-01", 900.0),
        entry("a", "2024-08-01", 100.0),
        entry("b", "2024-07-01", 100.0),
        entry("c", "2024-06-01", 100.0),
    ];
    assert_eq!(select_hashes(&entries, 2, 0.0, 500.0), ["a", "b"]);
}

#[test]
fn zero_limit_selects_nothing() {
    let entries = vec![entry("a", "2024-01-01", 100.0)];
    assert!(select_hashes(&entries, 0, 0.0, 500.0).is_empty());
}

#[test]
fn output_respects_limit_and_window_for_parsed_table() {
    let table: DeckTable = serde_json::from_value(serde_json::json!({
        "header": "Decks",
        "table": [
            { "urlhash": "h1", "savedate": "2023-12-30", "price": 120, "tags": [] },
            { "urlhash": "h2", "savedate": "2024-02-11", "price": 480.5 },
            { "urlhash": "h3", "savedate": "2024-01-15", "price": 250 },
            { "urlhash": "h4", "savedate": "2024-03-02", "price": 75 },
            { "urlhash": "h5", "savedate": "2024-03-01", "price": 333.33 },
        ]
    }))
    .unwrap();

    let selected = select_hashes(&table.table, 3, 100.0, 400.0);
    assert!(selected.len() <= 3);
    assert_eq!(selected, ["h5", "h3", "h1"]);
    for hash in &selected {
        let e = table.table.iter().find(|e| &e.url_hash == hash).unwrap();
        assert!((100.0..=400.0).contains(&e.price));
    }
}
