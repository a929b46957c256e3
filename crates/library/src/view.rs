use crate::document::{CustomCover, LcpInfo};
use crate::reading::Locator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title shown for publications whose record has none.
pub const UNTITLED: &str = "-";

/// Flattened, presentation-ready description of one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub identifier: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub languages: Vec<String>,
    pub publishers: Vec<String>,
    /// The identifier declared inside the manifest (ISBN, URN, ...), not the
    /// library's own.
    pub work_identifier: Option<String>,
    /// `YYYY-MM-DDTHH:MM:SS.sssZ`
    pub published_at: Option<String>,
    pub tags: Vec<String>,
    pub cover: Option<CoverView>,
    pub custom_cover: Option<CustomCover>,
    pub lcp: Option<LcpInfo>,
    pub lcp_rights_copies: Option<u64>,
    #[serde(rename = "RDFType")]
    pub rdf_type: Option<String>,
    /// Total duration in seconds, for audiobooks.
    pub duration: Option<f64>,
    pub nb_of_tracks: Option<u64>,
    /// The manifest as JSON. Never includes the license.
    pub r2_publication_json: Value,
    pub last_reading_location: Option<Locator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverView {
    pub thumbnail_url: String,
    pub cover_url: String,
}
impl CoverView {
    /// Both URLs point at the same image; there is no separate thumbnail.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { thumbnail_url: url.clone(), cover_url: url }
    }
}
