//! Locate and decode the `__NEXT_DATA__` payload.
//!
//! Two phases: find the payload script with a real HTML parse, then decode a
//! single typed shape (`props.pageProps.profile.sections[].events`). Each
//! failure point has its own [`ExtractError`] variant.

use crate::error::ExtractError;
use crate::model::RawEventBlob;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::debug;

/// Marker naming the embedded data script.
pub const NEXT_DATA_MARKER: &str = "__NEXT_DATA__";

/// Opening of an inline payload assignment.
const PAYLOAD_START: &str = r#"{"props""#;

#[derive(Debug, Deserialize)]
struct NextData {
    props: Props,
}

#[derive(Debug, Deserialize)]
struct Props {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    profile: Profile,
}

#[derive(Debug, Deserialize)]
struct Profile {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    events: Vec<RawEventBlob>,
}

/// Extract the raw event records of the first listing section.
pub fn extract_events(html: &str) -> Result<Vec<RawEventBlob>, ExtractError> {
    let payload = locate_payload(html)?;
    decode_events(&payload)
}

/// Phase one: find the payload text.
///
/// Prefers `<script id="__NEXT_DATA__">`; falls back to the first script
/// with an inline `__NEXT_DATA__ = {"props": ...}` assignment.
fn locate_payload(html: &str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);

    if let Ok(sel) = Selector::parse(r#"script#__NEXT_DATA__"#) {
        if let Some(el) = document.select(&sel).next() {
            let text: String = el.text().collect();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ExtractError::EmptyPayload);
            }
            return match trimmed.find('{') {
                Some(start) => Ok(trimmed[start..].to_string()),
                None => Err(ExtractError::EmptyPayload),
            };
        }
    }

    let mut referenced = false;
    if let Ok(sel) = Selector::parse("script") {
        for el in document.select(&sel) {
            let text: String = el.text().collect();
            let Some(marker) = text.find(NEXT_DATA_MARKER) else {
                continue;
            };
            referenced = true;
            // Scripts that only test for the global carry no payload.
            let after = &text[marker + NEXT_DATA_MARKER.len()..];
            if let Some(start) = after.find(PAYLOAD_START) {
                return Ok(after[start..].to_string());
            }
        }
    }

    if referenced {
        Err(ExtractError::EmptyPayload)
    } else {
        Err(ExtractError::MarkerMissing)
    }
}

/// Phase two: decode the typed shape and keep the first section.
///
/// Trailing script text after the object (`;`, further statements) is ignored.
fn decode_events(payload: &str) -> Result<Vec<RawEventBlob>, ExtractError> {
    let mut de = serde_json::Deserializer::from_str(payload);
    let data = NextData::deserialize(&mut de)?;

    let mut sections = data.props.page_props.profile.sections.into_iter();
    let first = sections.next().ok_or(ExtractError::NoSections)?;

    let ignored = sections.len();
    if ignored > 0 {
        debug!("reading first listing section only, {ignored} more ignored");
    }

    Ok(first.events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(script: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>Zebulon</title></head>\
             <body><div id=\"__next\"></div>{script}</body></html>"
        )
    }

    fn payload(sections: serde_json::Value) -> String {
        serde_json::json!({
            "props": {"pageProps": {"profile": {"name": "Zebulon", "sections": sections}}},
            "page": "/venue/[slug]",
            "buildId": "abc"
        })
        .to_string()
    }

    #[test]
    fn test_extracts_first_section_events() {
        let data = payload(serde_json::json!([
            {"events": [{"name": "One"}, {"name": "Two"}]},
            {"events": [{"name": "Later"}]}
        ]));
        let html = page(&format!(
            r#"<script id="__NEXT_DATA__" type="application/json">{data}</script>"#
        ));

        let events = extract_events(&html).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name.as_deref(), Some("One"));
        assert_eq!(events[1].name.as_deref(), Some("Two"));
    }

    /// Inline assignments are written `{"props": ...}` first, as Next.js does.
    fn inline_payload(events: serde_json::Value) -> String {
        let props = serde_json::json!({"pageProps": {"profile": {"sections": [{"events": events}]}}});
        format!(r#"{{"props":{props},"page":"/venue/[slug]","buildId":"abc"}}"#)
    }

    #[test]
    fn test_inline_assignment_fallback() {
        let data = inline_payload(serde_json::json!([{"name": "Inline"}]));
        let html = page(&format!(
            "<script>window.__NEXT_DATA__ = {data};__NEXT_LOADED_PAGES__=[];</script>"
        ));

        let events = extract_events(&html).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name.as_deref(), Some("Inline"));
    }

    #[test]
    fn test_reference_only_script_before_assignment() {
        let data = inline_payload(serde_json::json!([{"name": "Booted"}]));
        let html = page(&format!(
            "<script>if (window.__NEXT_DATA__) {{ boot() }}</script>\
             <script>window.__NEXT_DATA__ = {data};</script>"
        ));

        let events = extract_events(&html).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name.as_deref(), Some("Booted"));
    }

    #[test]
    fn test_reference_without_assignment_is_empty_payload() {
        let html = page("<script>if (window.__NEXT_DATA__) { boot() }</script>");
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::EmptyPayload)
        ));
    }

    #[test]
    fn test_missing_marker() {
        let html = page("<script>console.log('hi')</script>");
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::MarkerMissing)
        ));
    }

    #[test]
    fn test_empty_payload_script() {
        let html = page(r#"<script id="__NEXT_DATA__" type="application/json">  </script>"#);
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::EmptyPayload)
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let html = page(r#"<script id="__NEXT_DATA__">{"props": {"pageProps": </script>"#);
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let html = page(r#"<script id="__NEXT_DATA__">{"props": {"pageProps": {}}}</script>"#);
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::Malformed(_))
        ));
    }

    #[test]
    fn test_no_sections() {
        let data = payload(serde_json::json!([]));
        let html = page(&format!(r#"<script id="__NEXT_DATA__">{data}</script>"#));
        assert!(matches!(
            extract_events(&html),
            Err(ExtractError::NoSections)
        ));
    }

    #[test]
    fn test_section_without_events_is_empty_listing() {
        let data = payload(serde_json::json!([{"events": []}]));
        let html = page(&format!(r#"<script id="__NEXT_DATA__">{data}</script>"#));
        assert!(extract_events(&html).unwrap().is_empty());
    }
}
