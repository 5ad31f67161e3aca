//! Run the built-in rules over a saved search result page and print the
//! extracted records as JSON.
//!
//! Usage: `extract_map <html-file> [base-url]`
//!
//! Configuration is read from the file named by `SERP_RULES_CONFIG` (if set)
//! and from `SERP_RULES__*` environment variables.

use std::path::Path;

use anyhow::{Context, Result};
use serp_rules::infrastructure::init_logging_with_config;
use serp_rules::{AppConfig, IndexedResultSet, RuleDispatcher, SerpDocument};
use tracing::info;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let html_path = args.next().context("usage: extract_map <html-file> [base-url]")?;

    let config_path = std::env::var("SERP_RULES_CONFIG").ok();
    let mut config = AppConfig::load(config_path.as_deref().map(Path::new)).context("Failed to load configuration")?;
    if let Some(base_url) = args.next() {
        config.parsing.base_url = base_url;
    }

    init_logging_with_config(&config.logging)?;

    let html = std::fs::read_to_string(&html_path).with_context(|| format!("Failed to read {html_path}"))?;
    let document = SerpDocument::parse(&html, &config.parsing.base_url)?;
    let dispatcher = RuleDispatcher::with_default_rules(&config.parsing)?;
    info!("Parsing {} with rules {:?}", html_path, dispatcher.rule_names());

    let mut results = IndexedResultSet::new();
    let extracted = dispatcher.dispatch(&document, &mut results);
    info!("Extracted {} results from {}", extracted, html_path);

    println!("{}", serde_json::to_string_pretty(&results.to_json())?);
    Ok(())
}
