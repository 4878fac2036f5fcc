//! Command-line front end: analyze one commander and write text reports.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use edhrec_aggregator::{report, EdhrecAnalyzer, RunOptions};

const COMMANDER_FILE: &str = "commander.txt";

#[derive(Debug, Parser)]
#[command(name = "edhrec-aggregate", version, about = "Aggregate EDHREC decklists for a commander")]
struct Args {
    /// Commander name; read from commander.txt when omitted
    #[arg(long)]
    commander: Option<String>,

    /// Number of recent decks to use
    #[arg(long)]
    recent: usize,

    /// Minimum deck price
    #[arg(long)]
    min_price: f64,

    /// Maximum deck price
    #[arg(long)]
    max_price: f64,

    /// Cache directory for decks and card types
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Report directory (default: ./output/<slug>/edhrec-decklists)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let (commander, commander_source) = match args.commander {
        Some(name) => (name, "CLI"),
        None => {
            let name = fs::read_to_string(COMMANDER_FILE)
                .with_context(|| format!("no --commander given and {} is unreadable", COMMANDER_FILE))?;
            (name.trim().to_string(), "file")
        }
    };
    if commander.is_empty() {
        bail!("commander name is empty");
    }

    let options = RunOptions::new(commander, args.recent, args.min_price, args.max_price);
    let slug = options.slug();

    let mut builder = EdhrecAnalyzer::builder();
    if let Some(dir) = args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let analyzer = builder.build().context("failed to initialize analyzer")?;
    tracing::info!("{}", analyzer);

    let result = analyzer
        .run_with_progress(&options, |p| {
            tracing::info!(completed = p.completed, total = p.total, hash = p.hash, ok = p.deck.is_some(), "deck");
        })
        .with_context(|| format!("analysis of {:?} failed", options.commander))?;

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from("./output").join(&slug).join("edhrec-decklists"));
    let source = format!("commander={}, recent=CLI, min_price=CLI, max_price=CLI", commander_source);
    let header = report::metadata_header(&options, &source, chrono::Local::now());
    result
        .write_to(&output_dir, &header)
        .with_context(|| format!("failed to write reports to {}", output_dir.display()))?;

    println!(
        "Analyzed {} of {} selected decks ({} distinct cards); reports in {}",
        result.decks.len(),
        result.selected,
        result.card_counts.len(),
        output_dir.display()
    );
    Ok(())
}
