use folio_publication::license::Rights;
use serde::{Deserialize, Serialize};

/// The persisted record for one publication in the library.
///
/// Owned by the database layer; only read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_file: Option<CoverFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cover: Option<CustomCover>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<LcpInfo>,
    /// Characters copied so far under the license's copy right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp_rights_copies: Option<u64>,
}

/// The cover image extracted at import time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverFile {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Generated gradient cover for publications without an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCover {
    pub top_color: String,
    pub bottom_color: String,
}

/// License details copied onto the record when a protected publication is
/// imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcpInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<Rights>,
}
