//! The fixed venue record every event points at.

use serde::{Deserialize, Serialize};

/// A schema.org `Place` describing the venue.
///
/// Supplied by configuration and never derived from fetched data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueDescriptor {
    #[serde(rename = "@type", default = "place_type")]
    pub kind: String,
    /// Stable identifier; events reference the venue through it.
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub geo: GeoCoordinates,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    #[serde(rename = "@type", default = "geo_type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type", default = "address_type")]
    pub kind: String,
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    pub postal_code: String,
    pub address_country: String,
}

fn place_type() -> String {
    "Place".to_string()
}

fn geo_type() -> String {
    "GeoCoordinates".to_string()
}

fn address_type() -> String {
    "PostalAddress".to_string()
}

impl VenueDescriptor {
    /// Zebulon, Los Angeles.
    pub fn zebulon() -> Self {
        Self {
            kind: place_type(),
            id: "https://dice.fm/venue/zebulon-y8bv".to_string(),
            name: "Zebulon".to_string(),
            url: "https://zebulon.la/".to_string(),
            description: String::new(),
            geo: GeoCoordinates {
                kind: geo_type(),
                latitude: 34.1071962,
                longitude: -118.2547398,
            },
            address: PostalAddress {
                kind: address_type(),
                street_address: "2478 Fletcher Drive".to_string(),
                address_locality: "Los Angeles".to_string(),
                address_region: "CA".to_string(),
                postal_code: "90039".to_string(),
                address_country: "US".to_string(),
            },
        }
    }
}

impl Default for VenueDescriptor {
    fn default() -> Self {
        Self::zebulon()
    }
}
