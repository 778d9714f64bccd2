//! Normalized schema.org event records and the document that wraps them.

use super::venue::VenueDescriptor;
use super::SCHEMA_CONTEXT;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

pub const EVENT_SCHEDULED: &str = "https://schema.org/EventScheduled";
pub const OFFLINE_ATTENDANCE: &str = "https://schema.org/OfflineEventAttendanceMode";

/// Semantic event type, derived from the first listing tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Screening,
    Education,
    Music,
    /// Unrecognized tag, emitted verbatim.
    Other(String),
}

impl EventKind {
    /// Map a listing tag name (`film`, `talks`, `gig`, ...) to a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "film" => EventKind::Screening,
            "talks" => EventKind::Education,
            "gig" => EventKind::Music,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// The schema.org `@type` string.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Screening => "ScreeningEvent",
            EventKind::Education => "EducationEvent",
            EventKind::Music => "MusicEvent",
            EventKind::Other(tag) => tag,
        }
    }

    pub fn is_screening(&self) -> bool {
        matches!(self, EventKind::Screening)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Projection medium named in a screening description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoFormat {
    Dcp,
    Mm70,
    Mm35,
    Mm16,
}

impl VideoFormat {
    pub const ALL: [VideoFormat; 4] = [
        VideoFormat::Dcp,
        VideoFormat::Mm70,
        VideoFormat::Mm35,
        VideoFormat::Mm16,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFormat::Dcp => "DCP",
            VideoFormat::Mm70 => "70mm",
            VideoFormat::Mm35 => "35mm",
            VideoFormat::Mm16 => "16mm",
        }
    }

    /// Parse an exact vocabulary token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == token)
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VideoFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Lightweight reference to the venue by `@id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

impl PlaceRef {
    pub fn to(venue: &VenueDescriptor) -> Self {
        Self {
            kind: "Place",
            id: venue.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

impl ImageObject {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            kind: "ImageObject",
            url: url.into(),
        }
    }
}

/// The film behind a screening.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPresented {
    pub name: String,
    /// Run time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Four-digit release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_format: Option<VideoFormat>,
}

/// One normalized listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "eventStatus")]
    pub event_status: &'static str,
    #[serde(rename = "eventAttendanceMode")]
    pub attendance_mode: &'static str,
    #[serde(rename = "@type")]
    pub kind: EventKind,
    /// UTC instant, ISO-8601 with milliseconds.
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub location: PlaceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageObject>,
    pub name: String,
    pub description: String,
    /// Present only on screenings; always a single entry.
    #[serde(rename = "workPresented", skip_serializing_if = "Option::is_none")]
    pub work_presented: Option<Vec<WorkPresented>>,
    /// Whether a Q&A or in-person guest follows the screening.
    #[serde(
        rename = "postScreeningDiscussion",
        skip_serializing_if = "Option::is_none"
    )]
    pub discussion: Option<bool>,
}

impl NormalizedEvent {
    /// The screening's work record, if this is a screening.
    pub fn work(&self) -> Option<&WorkPresented> {
        self.work_presented.as_deref().and_then(|w| w.first())
    }
}

/// `{"@context": ..., "@graph": [events..., venue]}`.
///
/// The venue is always the last node, exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGraph {
    events: Vec<NormalizedEvent>,
    venue: VenueDescriptor,
}

impl ResultGraph {
    pub fn new(events: Vec<NormalizedEvent>, venue: VenueDescriptor) -> Self {
        Self { events, venue }
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    /// Number of nodes in `@graph`.
    pub fn node_count(&self) -> usize {
        self.events.len() + 1
    }
}

struct GraphNodes<'a>(&'a ResultGraph);

impl Serialize for GraphNodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let graph = self.0;
        let mut seq = serializer.serialize_seq(Some(graph.node_count()))?;
        for event in &graph.events {
            seq.serialize_element(event)?;
        }
        seq.serialize_element(&graph.venue)?;
        seq.end()
    }
}

impl Serialize for ResultGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("@context", SCHEMA_CONTEXT)?;
        map.serialize_entry("@graph", &GraphNodes(self))?;
        map.end()
    }
}

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Graph(ResultGraph),
    /// The page listed no events; written out as `[]`.
    Empty,
}

impl Listing {
    /// Wrap events with the venue, or `Empty` when there are none.
    pub fn from_events(events: Vec<NormalizedEvent>, venue: &VenueDescriptor) -> Self {
        if events.is_empty() {
            Listing::Empty
        } else {
            Listing::Graph(ResultGraph::new(events, venue.clone()))
        }
    }

    pub fn event_count(&self) -> usize {
        match self {
            Listing::Graph(graph) => graph.events().len(),
            Listing::Empty => 0,
        }
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Listing::Graph(graph) => graph.serialize(serializer),
            Listing::Empty => serializer.serialize_seq(Some(0))?.end(),
        }
    }
}
