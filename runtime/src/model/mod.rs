//! Data types flowing through the pipeline.
//!
//! [`raw`] holds the as-received payload records, [`event`] the schema.org
//! output records and [`venue`] the fixed location descriptor.

pub mod event;
pub mod raw;
pub mod venue;

pub use event::{EventKind, ImageObject, Listing, NormalizedEvent, PlaceRef, ResultGraph, VideoFormat, WorkPresented};
pub use raw::RawEventBlob;
pub use venue::{GeoCoordinates, PostalAddress, VenueDescriptor};

/// JSON-LD context shared by every emitted document.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";
