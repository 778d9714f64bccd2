//! Chromium-backed [`Renderer`] using chromiumoxide over CDP.

use super::discovery;
use super::{NavigationResult, RenderContext, Renderer, WaitCondition};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Interval between selector probes.
const SELECTOR_POLL: Duration = Duration::from_millis(100);

/// How to start the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit executable; discovered when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    /// Needed inside most containers.
    pub no_sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: false,
        }
    }
}

/// Launches one Chromium process per session.
pub struct ChromiumRenderer {
    options: LaunchOptions,
}

impl ChromiumRenderer {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn launch(&self) -> Result<Box<dyn RenderContext>> {
        let executable = discovery::find_chromium(self.options.executable.as_deref())
            .context("chromium not found; set ZEBULON_CHROMIUM_PATH")?;

        let mut builder = BrowserConfig::builder().chrome_executable(&executable);
        if !self.options.headless {
            builder = builder.with_head();
        }
        if self.options.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .with_context(|| format!("launching {}", executable.display()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("opening browser page")?;

        info!(
            "chromium started from {} ({})",
            executable.display(),
            if self.options.headless { "headless" } else { "headed" }
        );

        Ok(Box::new(ChromiumContext {
            browser,
            page,
            handler_task,
        }))
    }
}

/// One browser with one page.
pub struct ChromiumContext {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitCondition,
        timeout: Duration,
    ) -> Result<NavigationResult> {
        let start = Instant::now();

        tokio::time::timeout(timeout, goto_and_wait(&self.page, url, wait))
            .await
            .map_err(|_| {
                anyhow!(
                    "timed out after {}ms waiting for {} on {url}",
                    timeout.as_millis(),
                    wait.lifecycle_event()
                )
            })??;

        let final_url = self
            .page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let page = &self.page;
        let probe = async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        };

        tokio::time::timeout(timeout, probe)
            .await
            .map_err(|_| anyhow!("selector {selector:?} not found within {}ms", timeout.as_millis()))
    }

    async fn content(&mut self) -> Result<String> {
        self.page
            .content()
            .await
            .context("reading rendered document")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumContext {
            mut browser,
            page,
            handler_task,
        } = *self;

        if let Err(e) = page.close().await {
            warn!("failed to close page: {e}");
        }
        let closed = browser.close().await.context("closing chromium");
        if closed.is_ok() {
            let _ = browser.wait().await;
        }
        handler_task.abort();
        closed.map(|_| ())
    }
}

/// Navigate, then wait for the main frame's lifecycle event for `wait`.
///
/// Events from before the new document's `init` belong to the previous page
/// and are skipped.
async fn goto_and_wait(page: &Page, url: &str, wait: WaitCondition) -> Result<()> {
    let target = wait.lifecycle_event();
    let main_frame = page.mainframe().await.ok().flatten();
    let mut lifecycle = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .context("subscribing to lifecycle events")?;

    page.goto(url)
        .await
        .with_context(|| format!("navigating to {url}"))?;

    let mut seen_init = false;
    while let Some(event) = lifecycle.next().await {
        if main_frame.as_ref().is_some_and(|f| *f != event.frame_id) {
            continue;
        }
        if event.name == "init" {
            seen_init = true;
        } else if seen_init && event.name == target {
            debug!("{url}: {target} reached");
            return Ok(());
        }
    }

    Err(anyhow!("page closed before {target} on {url}"))
}
