//! Top-level run: one browser session, one fetch, one output file.

pub mod session;

use crate::config::ScrapeConfig;
use crate::error::{self, ConfigError, ScrapeError};
use crate::fetch::RetryingFetcher;
use crate::output;
use crate::renderer::Renderer;
use serde::Serialize;
use session::Session;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub url: String,
    pub events: usize,
    pub attempts: u32,
    pub output: PathBuf,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Runs the pipeline against one renderer.
pub struct Driver {
    renderer: Arc<dyn Renderer>,
    fetcher: RetryingFetcher,
    target_url: String,
    output: PathBuf,
}

impl Driver {
    pub fn new(
        renderer: Arc<dyn Renderer>,
        fetcher: RetryingFetcher,
        target_url: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            target_url: target_url.into(),
            output: output.into(),
        }
    }

    /// Build a driver from validated configuration.
    pub fn from_config(config: &ScrapeConfig, renderer: Arc<dyn Renderer>) -> Result<Self, ConfigError> {
        let fetcher = RetryingFetcher::new(config.fetch_settings(), config.normalizer()?);
        Ok(Self::new(
            renderer,
            fetcher,
            config.target_url.clone(),
            config.output.clone(),
        ))
    }

    /// Launch the browser, fetch, write the document, close the browser.
    ///
    /// The session is closed on every path after launch. On failure nothing
    /// is written and the previous output file is left as it was.
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let start = Instant::now();
        info!("scraping {}", self.target_url);

        let mut session = Session::launch(self.renderer.as_ref()).await.map_err(|e| {
            let err = ScrapeError::Browser(format!("{e:#}"));
            error!("{}", error::chain(&err));
            err
        })?;

        let result = match self.fetcher.fetch(session.page(), &self.target_url).await {
            Ok(outcome) => output::write_listing(&self.output, &outcome.listing).map(|()| RunSummary {
                url: self.target_url.clone(),
                events: outcome.listing.event_count(),
                attempts: outcome.attempts,
                output: self.output.clone(),
                elapsed: start.elapsed(),
            }),
            Err(e) => Err(e),
        };

        let session_age = session.uptime();
        if let Err(e) = session.close().await {
            warn!("failed to close browser session: {e:#}");
        }

        match &result {
            Ok(summary) => info!(
                "done: {} events in {:.1}s (session open {:.1}s)",
                summary.events,
                summary.elapsed.as_secs_f64(),
                session_age.as_secs_f64()
            ),
            Err(e) => error!("scrape failed, no output written: {}", error::chain(e)),
        }

        result
    }
}
