//! `zebulon parse <file>`: normalize a saved listing page without a browser.

use crate::cli::output::{self, Styled};
use crate::config::ScrapeConfig;
use crate::fetch::RetryingFetcher;
use crate::output as writer;
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

/// Writes to the configured output file, or prints the document to stdout
/// when `to_stdout` is set.
pub fn run(html_path: &Path, config: &ScrapeConfig, to_stdout: bool) -> Result<()> {
    let html = std::fs::read_to_string(html_path)
        .with_context(|| format!("reading {}", html_path.display()))?;

    let fetcher = RetryingFetcher::new(config.fetch_settings(), config.normalizer()?);
    let listing = fetcher.listing_from_html(&html)?;

    if to_stdout {
        println!("{}", writer::render_listing(&listing)?);
        return Ok(());
    }

    writer::write_listing(&config.output, &listing)?;

    let mode = output::mode();
    if mode.json {
        output::emit_json(&json!({
            "status": "ok",
            "source": html_path.display().to_string(),
            "events": listing.event_count(),
            "output": config.output.display().to_string(),
        }));
    } else if mode.chatty() {
        let s = Styled::detect();
        output::field(
            &s,
            true,
            "Parsed",
            &format!("{} events from {}", listing.event_count(), html_path.display()),
        );
        output::field(&s, true, "Output", &config.output.display().to_string());
    }

    Ok(())
}
