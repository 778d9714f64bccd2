//! Fetch the listing page, retrying any failed attempt.
//!
//! An attempt is navigate → baseline selector → rendered HTML → extract →
//! normalize. Attempts are independent: nothing from a failed attempt is
//! carried into the next one.

use super::backoff::BackoffPolicy;
use crate::error::{self, ScrapeError};
use crate::extraction::extract_events;
use crate::model::Listing;
use crate::normalize::Normalizer;
use crate::renderer::{RenderContext, WaitCondition};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Knobs for one fetch.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub backoff: BackoffPolicy,
    pub wait: WaitCondition,
    pub navigation_timeout: Duration,
    /// Element that must exist before the page is read.
    pub baseline_selector: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffPolicy::default(),
            wait: WaitCondition::NetworkAlmostIdle,
            navigation_timeout: Duration::from_millis(30_000),
            baseline_selector: "body".to_string(),
        }
    }
}

/// A successful fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub listing: Listing,
    /// Attempt that succeeded, 1-based.
    pub attempts: u32,
}

/// Drives a [`RenderContext`] until one attempt succeeds or attempts run out.
pub struct RetryingFetcher {
    settings: FetchSettings,
    normalizer: Normalizer,
}

impl RetryingFetcher {
    pub fn new(settings: FetchSettings, normalizer: Normalizer) -> Self {
        Self {
            settings,
            normalizer,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch and normalize `url`.
    ///
    /// Retryable failures back off and try again; after the last attempt the
    /// error is wrapped in [`ScrapeError::Exhausted`].
    pub async fn fetch(
        &self,
        ctx: &mut dyn RenderContext,
        url: &str,
    ) -> Result<FetchOutcome, ScrapeError> {
        let max = self.settings.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("fetching {url} (attempt {attempt}/{max})");

            let err = match self.attempt(ctx, url).await {
                Ok(listing) => {
                    info!(
                        "fetched {} events from {url} on attempt {attempt}",
                        listing.event_count()
                    );
                    return Ok(FetchOutcome {
                        listing,
                        attempts: attempt,
                    });
                }
                Err(e) => e,
            };

            warn!("attempt {attempt} failed: {}", error::chain(&err));

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= max {
                return Err(ScrapeError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self
                .settings
                .backoff
                .delay_for(attempt, &mut rand::thread_rng());
            info!("waiting {:.1}s before retry", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }

    /// Extract and normalize an HTML document without a browser.
    pub fn listing_from_html(&self, html: &str) -> Result<Listing, ScrapeError> {
        let blobs = extract_events(html)?;
        let events = self.normalizer.normalize_all(&blobs)?;
        Ok(Listing::from_events(events, self.normalizer.venue()))
    }

    async fn attempt(&self, ctx: &mut dyn RenderContext, url: &str) -> Result<Listing, ScrapeError> {
        let timeout = self.settings.navigation_timeout;

        let nav = ctx
            .navigate(url, self.settings.wait, timeout)
            .await
            .map_err(|e| ScrapeError::Navigation(format!("{e:#}")))?;
        debug!("loaded {} in {}ms", nav.final_url, nav.load_time_ms);

        ctx.wait_for_selector(&self.settings.baseline_selector, timeout)
            .await
            .map_err(|e| ScrapeError::Navigation(format!("{e:#}")))?;

        let html = ctx
            .content()
            .await
            .map_err(|e| ScrapeError::Navigation(format!("{e:#}")))?;

        self.listing_from_html(&html)
    }
}
