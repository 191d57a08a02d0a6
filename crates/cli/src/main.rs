use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::de::DeserializeOwned;

use tally_accounting::{Book, CashCount, LedgerEngine};
use tally_cli::{ReportConfig, build_report};

const USAGE: &str = "usage: tally <book.json> [cash-count.json]";

fn main() -> anyhow::Result<()> {
    tally_observability::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(book_path) = args.next() else {
        bail!(USAGE);
    };
    let cash_path = args.next();
    if args.next().is_some() {
        bail!(USAGE);
    }

    let cfg = ReportConfig::from_env();
    let engine = LedgerEngine::standard().with_tax_policy(cfg.tax_policy);

    let book: Book = read_json(&book_path)?;
    let cash_count = cash_path
        .as_deref()
        .map(read_json::<CashCount>)
        .transpose()?;
    tracing::info!(
        transactions = book.transactions().len(),
        adjustments = book.adjustments().len(),
        "loaded book from {}",
        book_path.display()
    );

    let report = build_report(&engine, &book, cash_count.as_ref())
        .with_context(|| format!("deriving report for {}", book_path.display()))?;

    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{json}");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
