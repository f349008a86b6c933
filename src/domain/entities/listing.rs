//! Content entities displayed by the admin console.
//!
//! These mirror the REST backend's JSON shapes; only the media-bearing
//! fields matter to the cache core, the rest is carried through untouched.

use serde::{Deserialize, Serialize};

use super::field_map::{FieldMap, FieldMode, field_map};

/// An apartment listing with its photo gallery and floor layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentListing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
}

impl ApartmentListing {
    /// Declares which listing fields hold media paths.
    #[must_use]
    pub fn media_fields() -> FieldMap {
        field_map([("images", FieldMode::Array), ("layout", FieldMode::Single)])
    }
}

/// A building complex with promotional photos and a site plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingComplex {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BuildingComplex {
    /// Declares which complex fields hold media paths.
    #[must_use]
    pub fn media_fields() -> FieldMap {
        field_map([("photos", FieldMode::Array), ("sitePlan", FieldMode::Single)])
    }
}

/// An entry in the remote file browser, with an optional preview image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl RemoteFile {
    /// Declares which file-browser fields hold media paths.
    #[must_use]
    pub fn media_fields() -> FieldMap {
        field_map([("preview", FieldMode::Single)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_round_trips_camel_case() {
        let json = r#"{
            "id": "apt-12",
            "title": "Two-room on Riverside",
            "images": ["photos/apt-12/1.jpg", "photos/apt-12/2.jpg"],
            "layout": "plans/apt-12.png",
            "price": 185000,
            "rooms": 2
        }"#;

        let listing: ApartmentListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.layout.as_deref(), Some("plans/apt-12.png"));

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["layout"], "plans/apt-12.png");
    }

    #[test]
    fn test_missing_media_fields_default() {
        let listing: ApartmentListing =
            serde_json::from_str(r#"{"id": "apt-1", "title": "Studio"}"#).unwrap();
        assert!(listing.images.is_empty());
        assert!(listing.layout.is_none());
    }

    #[test]
    fn test_media_field_declarations() {
        assert_eq!(
            ApartmentListing::media_fields().get("images"),
            Some(&FieldMode::Array)
        );
        assert_eq!(
            BuildingComplex::media_fields().get("sitePlan"),
            Some(&FieldMode::Single)
        );
        assert_eq!(
            RemoteFile::media_fields().get("preview"),
            Some(&FieldMode::Single)
        );
    }
}
