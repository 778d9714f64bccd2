//! The browser page one pipeline run borrows from launch to close.

use crate::renderer::{RenderContext, Renderer};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::debug;

/// A launched browser page, released exactly once.
///
/// [`Session::close`] takes `self`, so a session cannot be closed twice or
/// used after closing.
pub struct Session {
    page: Box<dyn RenderContext>,
    launched: Instant,
}

impl Session {
    /// Start a browser through `renderer`.
    pub async fn launch(renderer: &dyn Renderer) -> Result<Self> {
        let page = renderer.launch().await?;
        debug!("browser session started");
        Ok(Self {
            page,
            launched: Instant::now(),
        })
    }

    pub fn page(&mut self) -> &mut dyn RenderContext {
        self.page.as_mut()
    }

    /// Time since launch.
    pub fn uptime(&self) -> Duration {
        self.launched.elapsed()
    }

    pub async fn close(self) -> Result<()> {
        debug!(
            "closing browser session after {:.1}s",
            self.uptime().as_secs_f64()
        );
        self.page.close().await
    }
}
