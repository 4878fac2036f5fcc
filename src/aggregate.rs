//! Card counting across decklists.

use crate::models::{CardCounts, Deck};

/// Split a `"<quantity> <card name>"` line on its first space.
///
/// Returns `None` for lines without a space or whose first token is not an
/// integer.
pub fn parse_line(line: &str) -> Option<(i64, &str)> {
    let (qty, name) = line.split_once(' ')?;
    let qty = qty.parse::<i64>().ok()?;
    Some((qty, name))
}

/// Sum card quantities over every line of every deck. Malformed lines are
/// skipped. Totals saturate at the `i64` bounds instead of overflowing. The
/// result does not depend on deck order as long as no total saturates.
pub fn count_cards<'a, I>(decks: I) -> CardCounts
where
    I: IntoIterator<Item = &'a Deck>,
{
    let mut counts = CardCounts::new();
    for deck in decks {
        for line in &deck.lines {
            let Some((qty, name)) = parse_line(line) else {
                continue;
            };
            let total = counts.entry(name.to_string()).or_insert(0);
            let current = *total;
            *total = current.checked_add(qty).unwrap_or_else(|| {
                tracing::warn!(card = name, qty, "card count overflow; saturating");
                current.saturating_add(qty)
            });
        }
    }
    counts
}
