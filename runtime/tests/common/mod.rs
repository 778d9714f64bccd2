//! Scripted browser doubles shared by the integration tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono_tz::America::Los_Angeles;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zebulon_runtime::fetch::{BackoffPolicy, FetchSettings, RetryingFetcher};
use zebulon_runtime::model::VenueDescriptor;
use zebulon_runtime::normalize::Normalizer;
use zebulon_runtime::renderer::{NavigationResult, RenderContext, Renderer, WaitCondition};

pub const LISTING_URL: &str = "https://dice.fm/venue/zebulon-y8bv";

/// The saved listing page fixture.
pub fn listing_html() -> String {
    include_str!("../fixtures/listing.html").to_string()
}

/// What the next navigation produces.
#[derive(Debug, Clone)]
pub enum Step {
    /// Navigation succeeds and the page renders this HTML.
    Page(String),
    /// Navigation fails with this message.
    NavFail(String),
}

/// Call counters visible after the context has been moved into a session.
#[derive(Debug, Default)]
pub struct Counters {
    pub launches: AtomicUsize,
    pub navigations: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Counters {
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

/// A page that replays a fixed script. Once the script runs out the last
/// step repeats.
pub struct ScriptedContext {
    steps: VecDeque<Step>,
    last: Option<Step>,
    current: Option<String>,
    counters: Arc<Counters>,
}

impl ScriptedContext {
    pub fn new(steps: Vec<Step>, counters: Arc<Counters>) -> Self {
        Self {
            steps: steps.into(),
            last: None,
            current: None,
            counters,
        }
    }
}

#[async_trait]
impl RenderContext for ScriptedContext {
    async fn navigate(
        &mut self,
        url: &str,
        _wait: WaitCondition,
        _timeout: Duration,
    ) -> Result<NavigationResult> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        let step = match self.steps.pop_front() {
            Some(step) => step,
            None => self
                .last
                .clone()
                .ok_or_else(|| anyhow!("script is empty"))?,
        };
        self.last = Some(step.clone());

        match step {
            Step::Page(html) => {
                self.current = Some(html);
                Ok(NavigationResult {
                    final_url: url.to_string(),
                    load_time_ms: 5,
                })
            }
            Step::NavFail(msg) => {
                self.current = None;
                Err(anyhow!(msg))
            }
        }
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        match &self.current {
            Some(html) if html.contains(&format!("<{selector}")) => Ok(()),
            _ => Err(anyhow!("selector {selector} not found")),
        }
    }

    async fn content(&mut self) -> Result<String> {
        self.current.clone().ok_or_else(|| anyhow!("no document"))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one [`ScriptedContext`] per launch, or fails to launch.
pub struct ScriptedRenderer {
    steps: Mutex<Option<Vec<Step>>>,
    pub counters: Arc<Counters>,
}

impl ScriptedRenderer {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(Some(steps)),
            counters: Arc::new(Counters::default()),
        }
    }

    /// A renderer whose browser never starts.
    pub fn broken() -> Self {
        Self {
            steps: Mutex::new(None),
            counters: Arc::new(Counters::default()),
        }
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn launch(&self) -> Result<Box<dyn RenderContext>> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        let steps = self
            .steps
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .take()
            .ok_or_else(|| anyhow!("chromium not found"))?;
        Ok(Box::new(ScriptedContext::new(steps, self.counters.clone())))
    }
}

/// Fast settings: tiny base delay, no jitter.
pub fn fast_settings(max_attempts: u32) -> FetchSettings {
    FetchSettings {
        max_attempts,
        backoff: BackoffPolicy::new(Duration::from_millis(1), Duration::ZERO),
        ..FetchSettings::default()
    }
}

pub fn fetcher(max_attempts: u32) -> RetryingFetcher {
    RetryingFetcher::new(
        fast_settings(max_attempts),
        Normalizer::new(VenueDescriptor::zebulon(), Los_Angeles),
    )
}
