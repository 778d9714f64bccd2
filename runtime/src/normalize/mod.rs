//! Raw listing records to schema.org events.
//!
//! Type, dates and share URL are required; a record missing any of them
//! fails the whole attempt. Everything mined from free text is optional and
//! silently left unset when absent.

pub mod mining;
pub mod time;

use crate::error::FieldError;
use crate::model::event::{EVENT_SCHEDULED, OFFLINE_ATTENDANCE};
use crate::model::{
    EventKind, ImageObject, NormalizedEvent, PlaceRef, RawEventBlob, VenueDescriptor,
    WorkPresented, SCHEMA_CONTEXT,
};
use chrono_tz::Tz;
use mining::MiningInput;
use tracing::debug;

/// Prefix some listing names carry, e.g. `SCREENING: Wanda`.
pub const SCREENING_PREFIX: &str = "SCREENING:";

/// Converts raw records for one venue.
#[derive(Debug, Clone)]
pub struct Normalizer {
    venue: VenueDescriptor,
    timezone: Tz,
}

impl Normalizer {
    pub fn new(venue: VenueDescriptor, timezone: Tz) -> Self {
        Self { venue, timezone }
    }

    pub fn venue(&self) -> &VenueDescriptor {
        &self.venue
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Normalize every record, failing on the first invalid one.
    pub fn normalize_all(&self, blobs: &[RawEventBlob]) -> Result<Vec<NormalizedEvent>, FieldError> {
        blobs.iter().map(|b| self.normalize(b)).collect()
    }

    /// Normalize one record.
    pub fn normalize(&self, blob: &RawEventBlob) -> Result<NormalizedEvent, FieldError> {
        let kind = EventKind::from_tag(blob.first_tag().ok_or(FieldError::MissingTag)?);
        let start_date = self.utc_date(blob.start_date(), "event_start_date")?;
        let end_date = self.utc_date(blob.end_date(), "event_end_date")?;
        let share_url = blob.share_url().ok_or(FieldError::MissingShareUrl)?;

        let name = clean_name(blob.name.as_deref().unwrap_or(""));
        let description = blob.description();

        let (work_presented, discussion) = if kind.is_screening() {
            let mined = mining::mine(&MiningInput {
                description,
                presented_by: blob.presented_by(),
            });
            debug!(
                name = %name,
                director = ?mined.director,
                year = ?mined.year,
                duration = ?mined.duration,
                format = ?mined.video_format,
                "mined screening metadata"
            );
            let work = WorkPresented {
                name: name.clone(),
                duration: mined.duration,
                director: mined.director,
                year: mined.year,
                video_format: mined.video_format,
            };
            (
                Some(vec![work]),
                Some(mining::mentions_discussion(description)),
            )
        } else {
            (None, None)
        };

        Ok(NormalizedEvent {
            context: SCHEMA_CONTEXT,
            event_status: EVENT_SCHEDULED,
            attendance_mode: OFFLINE_ATTENDANCE,
            kind,
            start_date,
            end_date,
            id: share_url.to_string(),
            url: share_url.to_string(),
            location: PlaceRef::to(&self.venue),
            image: blob.square_image().map(ImageObject::new),
            name,
            description: description.to_string(),
            work_presented,
            discussion,
        })
    }

    fn utc_date(&self, raw: Option<&str>, field: &'static str) -> Result<String, FieldError> {
        let raw = raw.ok_or(FieldError::MissingDate(field))?;
        time::local_to_utc_iso(raw, self.timezone).ok_or_else(|| FieldError::InvalidDate {
            field,
            value: raw.to_string(),
        })
    }
}

/// Drop a leading `SCREENING:` and the space after it.
pub fn clean_name(name: &str) -> String {
    match name.strip_prefix(SCREENING_PREFIX) {
        Some(rest) => rest.trim_start().to_string(),
        None => name.to_string(),
    }
}
