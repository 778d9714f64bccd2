//! Typed errors for the scrape pipeline.
//!
//! Every failure inside one fetch attempt is a [`ScrapeError`]; the retrying
//! fetcher decides whether to try again with [`ScrapeError::is_retryable`].

use thiserror::Error;

/// Failures while pulling the embedded payload out of rendered HTML.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No `__NEXT_DATA__` script in the document.
    #[error("embedded data marker __NEXT_DATA__ not found")]
    MarkerMissing,

    /// The marker script exists but holds no JSON object.
    #[error("embedded data script contains no JSON object")]
    EmptyPayload,

    /// Payload text is not JSON, or not the expected shape.
    #[error("malformed embedded payload")]
    Malformed(#[from] serde_json::Error),

    /// The venue profile has no event sections.
    #[error("venue profile has no event sections")]
    NoSections,
}

/// A required field is missing or unusable on a raw event record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("event has no type tag")]
    MissingTag,

    #[error("event is missing {0}")]
    MissingDate(&'static str),

    #[error("event {field} is not a local timestamp: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("event has no share url")]
    MissingShareUrl,
}

/// Errors surfaced by the fetch pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Navigation timed out, failed, or baseline content never appeared.
    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("extraction failed")]
    Extraction(#[from] ExtractError),

    #[error("invalid event record")]
    Field(#[from] FieldError),

    /// All attempts failed; carries the last underlying error.
    #[error("failed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<ScrapeError>,
    },

    /// The browser could not be started or the session could not be opened.
    #[error("browser unavailable: {0}")]
    Browser(String),

    #[error("writing output failed")]
    Output(#[from] std::io::Error),

    #[error("serializing output failed")]
    Serialize(#[source] serde_json::Error),
}

/// An error and its causes on one line, `outer: cause: root`.
///
/// Display strings never repeat their source, so this is the form to log.
pub fn chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        text.push_str(": ");
        text.push_str(&e.to_string());
        cause = e.source();
    }
    text
}

impl ScrapeError {
    /// Whether a fresh attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Navigation(_) | ScrapeError::Extraction(_) | ScrapeError::Field(_)
        )
    }
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid target url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error("max_attempts must be at least 1")]
    NoAttempts,
}
