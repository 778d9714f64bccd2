//! Raw event records as they appear in the embedded page payload.
//!
//! Every field is optional at parse time. Whether a missing field is fatal is
//! decided by the normalizer, not by deserialization, so one bad record shows
//! up as a field error instead of a malformed payload.

use serde::Deserialize;

/// One event record from `profile.sections[0].events`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEventBlob {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags_types: Option<Vec<TagType>>,
    #[serde(default)]
    pub about: Option<About>,
    #[serde(default)]
    pub dates: Option<Dates>,
    /// Series or presenter name, e.g. "Mezzanine presents".
    #[serde(default)]
    pub presented_by: Option<String>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TagType {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct About {
    #[serde(default)]
    pub description: Option<String>,
}

/// Local wall-clock timestamps, possibly with trailing offset or fraction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dates {
    #[serde(default)]
    pub event_start_date: Option<String>,
    #[serde(default)]
    pub event_end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub square: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub event_share: Option<String>,
}

impl RawEventBlob {
    /// Name of the first type tag, if any.
    pub fn first_tag(&self) -> Option<&str> {
        self.tags_types
            .as_deref()
            .and_then(|tags| tags.first())
            .and_then(|t| t.name.as_deref())
    }

    /// Free-text description, empty when absent.
    pub fn description(&self) -> &str {
        self.about
            .as_ref()
            .and_then(|a| a.description.as_deref())
            .unwrap_or("")
    }

    pub fn presented_by(&self) -> &str {
        self.presented_by.as_deref().unwrap_or("")
    }

    pub fn start_date(&self) -> Option<&str> {
        self.dates.as_ref().and_then(|d| d.event_start_date.as_deref())
    }

    pub fn end_date(&self) -> Option<&str> {
        self.dates.as_ref().and_then(|d| d.event_end_date.as_deref())
    }

    /// Square image URL; empty strings count as absent.
    pub fn square_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|i| i.square.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn share_url(&self) -> Option<&str> {
        self.social_links
            .as_ref()
            .and_then(|s| s.event_share.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let blob: RawEventBlob = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "name": "Night Shift",
            "tags_types": [{"name": "gig", "value": "music:gig"}],
            "dates": {"event_start_date": "2024-03-15T20:00:00-07:00", "timezone": "America/Los_Angeles"},
            "price": {"amount": 1500}
        }))
        .unwrap();

        assert_eq!(blob.first_tag(), Some("gig"));
        assert_eq!(blob.start_date(), Some("2024-03-15T20:00:00-07:00"));
        assert_eq!(blob.end_date(), None);
        assert_eq!(blob.description(), "");
    }

    #[test]
    fn test_empty_image_and_share_are_absent() {
        let blob: RawEventBlob = serde_json::from_value(serde_json::json!({
            "images": {"square": ""},
            "social_links": {"event_share": ""}
        }))
        .unwrap();

        assert!(blob.square_image().is_none());
        assert!(blob.share_url().is_none());
    }
}
