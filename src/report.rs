//! Report assembly: ordered card lists, run metadata and text rendering.
//!
//! The pipeline itself never writes files; [`AnalysisReport::write_to`] is
//! the single place that turns a finished run into report files.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{CardCategory, CardCounts, Deck, TypeGroups};
use crate::RunOptions;

pub const MASTER_FILE: &str = "master_card_counts.txt";

/// `(card, count)` pairs, most played first, ties by name.
pub fn sorted_counts(counts: &CardCounts) -> Vec<(String, i64)> {
    let mut pairs: Vec<(String, i64)> = counts
        .iter()
        .map(|(card, count)| (card.clone(), *count))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

/// One `"<count>  <card>"` line per pair.
pub fn render_counts(pairs: &[(String, i64)]) -> String {
    let mut out = String::new();
    for (card, count) in pairs {
        let _ = writeln!(out, "{}  {}", count, card);
    }
    out
}

/// All decklists, one line per card, decks separated by a blank line.
pub fn render_decklists(decks: &[Deck]) -> String {
    let mut out = String::new();
    for deck in decks {
        out.push_str(&deck.lines.join("\n"));
        out.push_str("\n\n");
    }
    out
}

/// Header block prepended to every report file.
pub fn metadata_header(options: &RunOptions, source: &str, timestamp: DateTime<Local>) -> String {
    [
        "Commander Run Metadata".to_string(),
        "======================".to_string(),
        String::new(),
        format!("Timestamp: {}", timestamp.format("%Y-%m-%d %H:%M:%S")),
        format!("Commander: {}", options.commander),
        format!("Max Decks: {}", options.limit),
        format!("Min Price: {}", options.min_price),
        format!("Max Price: {}", options.max_price),
        format!("Input Source: {}", source),
        String::new(),
        "Results".to_string(),
        "======".to_string(),
        String::new(),
    ]
    .join("\n")
}

pub fn category_file_name(category: CardCategory) -> String {
    format!("cards_{}.txt", category.label().to_lowercase())
}

// ---------------------------------------------------------------------------
// AnalysisReport
// ---------------------------------------------------------------------------

/// Everything one pipeline run produced, as plain in-memory data.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub options: RunOptions,
    pub slug: String,
    /// Number of hashes selected for download.
    pub selected: usize,
    pub decks: Vec<Deck>,
    pub card_counts: CardCounts,
    pub type_groups: TypeGroups,
}

impl AnalysisReport {
    /// Ordered `(card, count)` pairs for every non-empty category.
    pub fn categories(&self) -> Vec<(CardCategory, Vec<(String, i64)>)> {
        self.type_groups
            .iter()
            .filter(|(_, cards)| !cards.is_empty())
            .map(|(category, cards)| (category, sorted_counts(cards)))
            .collect()
    }

    /// Empty `dir` of plain files (creating it if needed) and write the
    /// master list, one file per non-empty category and the decklists.
    ///
    /// Returns the paths written, master list first.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P, header: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        clean_dir(dir)?;

        let mut written = Vec::new();
        let mut write = |name: String, body: String| -> Result<()> {
            let path = dir.join(name);
            let mut contents = String::with_capacity(header.len() + body.len() + 1);
            if !header.is_empty() {
                contents.push_str(header);
                contents.push('\n');
            }
            contents.push_str(&body);
            fs::write(&path, contents)?;
            written.push(path);
            Ok(())
        };

        write(MASTER_FILE.to_string(), render_counts(&sorted_counts(&self.card_counts)))?;
        for (category, pairs) in self.categories() {
            write(category_file_name(category), render_counts(&pairs))?;
        }
        write(format!("{}-decklists.txt", self.slug), render_decklists(&self.decks))?;

        tracing::info!(dir = %dir.display(), files = written.len(), "reports written");
        Ok(written)
    }
}

fn clean_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not remove old report");
            }
        }
    }
    Ok(())
}
