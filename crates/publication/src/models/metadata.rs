use super::{Contributor, LocalizedString, date, one_or_many};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Additional metadata field holding the number of audio tracks.
const TRACKS_FIELD: &str = "tracks";

/// Descriptive metadata of a publication.
///
/// Only the fields the library reads are typed; everything else in the
/// manifest's `metadata` object (translators, subjects, accessibility, ...)
/// is kept in [`additional`](Self::additional) and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema.org type, e.g. `http://schema.org/Audiobook`.
    #[serde(default, rename = "@type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(default)]
    pub title: LocalizedString,
    /// Work identifier (ISBN, URN, UUID, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(
        default,
        rename = "author",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authors: Vec<Contributor>,
    #[serde(
        default,
        rename = "publisher",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub publishers: Vec<Contributor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// BCP 47 language tags.
    #[serde(
        default,
        rename = "language",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub languages: Vec<String>,
    /// Publication date as written in the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Total duration in seconds, for audiobooks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Metadata {
    /// Publication date normalized to a UTC timestamp
    /// (`YYYY-MM-DDTHH:MM:SS.sssZ`).
    ///
    /// Returns `None` if the manifest has no date, or one that can't be read.
    ///
    /// ```
    /// use folio_publication::Metadata;
    ///
    /// let metadata = Metadata { published: Some("1851-10-18".to_string()), ..Default::default() };
    /// assert_eq!(metadata.published_at().as_deref(), Some("1851-10-18T00:00:00.000Z"));
    /// ```
    pub fn published_at(&self) -> Option<String> {
        let raw = self.published.as_deref()?;
        let normalized = date::parse(raw).and_then(date::format);
        if normalized.is_none() {
            tracing::debug!(published = raw, "Ignoring unreadable publication date");
        }
        normalized
    }

    /// Number of audio tracks, stored by audiobook packagers as an
    /// additional `tracks` field.
    pub fn track_count(&self) -> Option<u64> {
        self.additional.get(TRACKS_FIELD).and_then(Value::as_u64)
    }
}
