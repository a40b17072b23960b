//! Google Books volume records as returned by the volumes endpoint.
//!
//! Every field is optional: the vendor omits whatever it does not know.
//! Unrecognized fields are kept in `extra` so the record can be written back
//! out verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Treat an explicit `null` list the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level response of `GET /volumes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub total_items: Option<u64>,

    /// Absent when nothing matched
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<CandidateRecord>,
}

/// One matched volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    /// Vendor volume identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_info: Option<VolumeInfo>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Bibliographic metadata of a volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authors: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub industry_identifiers: Vec<IndustryIdentifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// "1925", "2004-09-30", "2004-09" ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// An identifier entry such as `{"type": "ISBN_13", "identifier": "978..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

impl IndustryIdentifier {
    pub fn new(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    pub fn is_isbn10(&self) -> bool {
        self.kind == "ISBN_10"
    }

    pub fn is_isbn13(&self) -> bool {
        self.kind == "ISBN_13"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
