//! `zebulon scrape`: fetch the live listing page and write the document.

use crate::cli::output::{self, Styled};
use crate::config::ScrapeConfig;
use crate::error;
use crate::pipeline::Driver;
use crate::renderer::chromium::ChromiumRenderer;
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

pub async fn run(config: ScrapeConfig) -> Result<()> {
    let mode = output::mode();
    let s = Styled::detect();
    let renderer = Arc::new(ChromiumRenderer::new(config.launch_options()));
    let driver = Driver::from_config(&config, renderer)?;

    if mode.chatty() {
        output::banner(&s);
        eprintln!("  Scraping {}", config.target_url);
        if mode.verbose {
            eprintln!(
                "  {} attempts, {}ms base delay, {}ms timeout, {}",
                config.max_attempts,
                config.base_delay_ms,
                config.navigation_timeout_ms,
                if config.headless { "headless" } else { "headed" }
            );
        }
        eprintln!();
    }

    let result = driver.run().await;

    match &result {
        Ok(summary) if mode.json => output::emit_json(&json!({"status": "ok", "summary": summary})),
        Err(e) if mode.json => output::emit_json(&json!({"status": "error", "error": error::chain(e)})),
        Ok(summary) if mode.chatty() => {
            output::field(&s, true, "Events", &summary.events.to_string());
            output::field(&s, true, "Attempts", &summary.attempts.to_string());
            output::field(&s, true, "Output", &summary.output.display().to_string());
            output::verdict(&s, true, &format!("{:.1}s", summary.elapsed.as_secs_f64()));
        }
        Err(e) if mode.chatty() => {
            output::field(&s, false, "Scrape", &error::chain(e));
            output::verdict(&s, false, "no output written");
        }
        _ => {}
    }

    result.map(|_| ()).map_err(Into::into)
}
