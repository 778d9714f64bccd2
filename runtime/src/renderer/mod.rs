//! Browser rendering abstraction.
//!
//! The pipeline only needs three things from a browser: navigate and wait,
//! check that baseline content exists, and hand back the rendered markup.
//! [`chromium`] implements them with chromiumoxide; tests script them.

pub mod chromium;
pub mod discovery;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitCondition {
    /// The `load` event fired.
    Load,
    /// At most two connections in flight for 500 ms.
    #[default]
    NetworkAlmostIdle,
    /// No connections in flight for 500 ms.
    NetworkIdle,
}

impl WaitCondition {
    /// Chromium lifecycle event name that satisfies this condition.
    pub fn lifecycle_event(&self) -> &'static str {
        match self {
            WaitCondition::Load => "load",
            WaitCondition::NetworkAlmostIdle => "networkAlmostIdle",
            WaitCondition::NetworkIdle => "networkIdle",
        }
    }
}

/// Outcome of a navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigationResult {
    /// URL after redirects.
    pub final_url: String,
    pub load_time_ms: u64,
}

/// A single page in a running browser.
#[async_trait]
pub trait RenderContext: Send {
    /// Navigate to `url` and wait for `wait`, all within `timeout`.
    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitCondition,
        timeout: Duration,
    ) -> Result<NavigationResult>;

    /// Wait until an element matching `selector` exists.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Full rendered HTML of the current document.
    async fn content(&mut self) -> Result<String>;

    /// Release the page and its browser.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Starts browser sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderContext>>;
}
