//! Payload extraction from rendered listing pages.
//!
//! The listing page is a Next.js app; its event data ships inline as the
//! `__NEXT_DATA__` JSON blob, which is a steadier source than the visual DOM.

pub mod next_data;

pub use next_data::{extract_events, NEXT_DATA_MARKER};
