//! Run configuration.
//!
//! Precedence, lowest first: built-in defaults (the Zebulon listing), an
//! optional JSON config file, `ZEBULON_*` environment variables, then CLI
//! flags applied by the binary.

use crate::error::ConfigError;
use crate::fetch::{BackoffPolicy, FetchSettings};
use crate::model::VenueDescriptor;
use crate::normalize::Normalizer;
use crate::renderer::chromium::LaunchOptions;
use crate::renderer::discovery::CHROMIUM_PATH_ENV;
use crate::renderer::WaitCondition;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const NO_SANDBOX_ENV: &str = "ZEBULON_CHROMIUM_NO_SANDBOX";
pub const OUTPUT_ENV: &str = "ZEBULON_OUTPUT";

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Listing page to fetch.
    pub target_url: String,
    /// IANA zone the listing's wall-clock times are in.
    pub timezone: String,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    /// Upper bound of the random delay added to each backoff.
    pub jitter_ms: u64,
    pub navigation_timeout_ms: u64,
    pub baseline_selector: String,
    pub output: PathBuf,
    pub headless: bool,
    pub chromium_path: Option<PathBuf>,
    pub no_sandbox: bool,
    pub venue: VenueDescriptor,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let venue = VenueDescriptor::zebulon();
        Self {
            target_url: venue.id.clone(),
            timezone: "America/Los_Angeles".to_string(),
            max_attempts: 3,
            base_delay_ms: 2000,
            jitter_ms: 1000,
            navigation_timeout_ms: 30_000,
            baseline_selector: "body".to_string(),
            output: PathBuf::from("zebulon.json"),
            headless: true,
            chromium_path: None,
            no_sandbox: false,
            venue,
        }
    }
}

impl ScrapeConfig {
    /// Defaults, overlaid with `path` when given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `ZEBULON_*` overrides looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = var(CHROMIUM_PATH_ENV).filter(|p| !p.is_empty()) {
            self.chromium_path = Some(PathBuf::from(p));
        }
        if var(NO_SANDBOX_ENV).is_some() {
            self.no_sandbox = true;
        }
        if let Some(out) = var(OUTPUT_ENV).filter(|p| !p.is_empty()) {
            self.output = PathBuf::from(out);
        }
    }

    /// Check the values and resolve the timezone.
    pub fn validate(&self) -> Result<Tz, ConfigError> {
        let url = Url::parse(&self.target_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.target_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.target_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            max_attempts: self.max_attempts,
            backoff: BackoffPolicy::new(
                Duration::from_millis(self.base_delay_ms),
                Duration::from_millis(self.jitter_ms),
            ),
            wait: WaitCondition::NetworkAlmostIdle,
            navigation_timeout: Duration::from_millis(self.navigation_timeout_ms),
            baseline_selector: self.baseline_selector.clone(),
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            executable: self.chromium_path.clone(),
            headless: self.headless,
            no_sandbox: self.no_sandbox,
        }
    }

    /// A normalizer for the configured venue; validates first.
    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        let tz = self.validate()?;
        Ok(Normalizer::new(self.venue.clone(), tz))
    }
}
