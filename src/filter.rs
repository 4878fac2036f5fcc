//! Deck selection by price window and recency.

use crate::models::DeckTableEntry;

/// Pick the hashes of the `limit` most recently saved decks whose price lies
/// in `[min_price, max_price]` (inclusive).
///
/// Entries saved on the same date keep their index order. Pure; no I/O.
pub fn select_hashes(
    entries: &[DeckTableEntry],
    limit: usize,
    min_price: f64,
    max_price: f64,
) -> Vec<String> {
    let mut in_budget: Vec<&DeckTableEntry> = entries
        .iter()
        .filter(|e| min_price <= e.price && e.price <= max_price)
        .collect();

    // sort_by is stable, which gives the tie-break on equal dates.
    in_budget.sort_by(|a, b| b.save_date.cmp(&a.save_date));

    in_budget
        .into_iter()
        .take(limit)
        .map(|e| e.url_hash.clone())
        .collect()
}
