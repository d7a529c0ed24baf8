//! Attraction payloads and the records derived from them.
//!
//! `RawAttraction` is the shape submitted by clients to the ingestion endpoint.
//! Once it passes validation the backend flattens it into an `AttractionRecord`,
//! serializing the nested `description` and `location` objects into opaque JSON
//! strings. Those strings are what the cache and the external store persist; the
//! sync pipeline never looks inside them.

use serde::{Deserialize, Serialize};

/// An attraction exactly as submitted by a client.
///
/// Unknown fields are rejected at every level so that a typo in a key is reported
/// instead of silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAttraction {
    pub category: String,
    pub description: Description,
    pub location: Location,
    #[serde(default)]
    pub image: ImageRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Description {
    pub name: String,
    pub hours: OpeningHours,
    pub info: String,
}

/// Opening hours as `HH:MM-HH:MM` ranges: weekdays, Saturday and Sunday.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningHours {
    pub wkd: String,
    pub std: String,
    pub snd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub city: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coordinates {
    pub latitude: f32,
    pub longitude: f32,
}

/// Optional photo reference. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub copyright: String,
}

/// A validated attraction as it is stored in the cache and written to the
/// external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionRecord {
    /// Normalized identifier derived once from the submitted name.
    pub id: String,
    pub category: String,
    /// Serialized `Description`.
    pub description: String,
    /// Serialized `Location`.
    pub location: String,
    /// Display name, trimmed.
    pub name: String,
    pub image_url: Option<String>,
    pub image_copyright: Option<String>,
}

/// The `(compare id, display name)` projection used for duplicate lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub compare_id: String,
    pub display_name: String,
}

impl Title {
    pub fn new(compare_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            compare_id: compare_id.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<&AttractionRecord> for Title {
    fn from(record: &AttractionRecord) -> Self {
        Title::new(record.id.clone(), record.name.clone())
    }
}
