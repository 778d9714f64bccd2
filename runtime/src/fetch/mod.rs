//! Resilient page retrieval.

pub mod backoff;
pub mod retry;

pub use backoff::BackoffPolicy;
pub use retry::{FetchOutcome, FetchSettings, RetryingFetcher};
