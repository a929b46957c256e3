use super::{Link, Metadata, one_or_many};
use crate::error::{ErrorKind, Result};
use crate::license::{Active, License};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fully deserialized publication manifest.
///
/// The attached [`license`](Self::license) is deliberately left out of every
/// JSON form produced here: licenses are sensitive and persisted separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(
        default,
        rename = "@context",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub context: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, rename = "readingOrder", skip_serializing_if = "Vec::is_empty")]
    pub reading_order: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Link>,
    /// Top-level fields not modelled above (`toc`, `landmarks`, ...).
    #[serde(flatten)]
    pub additional: Map<String, Value>,
    #[serde(skip)]
    pub license: Option<License<Active>>,
}

impl Publication {
    /// Decodes a manifest from its JSON text.
    ///
    /// The result never carries a license; attach one separately.
    pub fn from_manifest_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).or_raise(|| ErrorKind::InvalidManifest)
    }

    /// Encodes the manifest as pretty-printed (2-space indented) JSON, the
    /// form persisted as `manifest.json`.
    pub fn to_manifest_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).or_raise(|| ErrorKind::Serialize("publication manifest"))
    }

    /// Encodes the manifest as a JSON value for embedding in other documents.
    pub fn to_manifest_value(&self) -> Result<Value> {
        serde_json::to_value(self).or_raise(|| ErrorKind::Serialize("publication manifest"))
    }

    pub fn with_license(mut self, license: License<Active>) -> Self {
        self.license = Some(license);
        self
    }

    /// Whether the publication is DRM-protected by an attached LCP license.
    pub fn is_protected(&self) -> bool {
        self.license.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::tests::well_formed_license_json;
    use crate::{Contributor, License};
    use serde_json::json;

    fn moby_dick() -> Value {
        json!({
            "@context": "https://readium.org/webpub-manifest/context.jsonld",
            "metadata": {
                "@type": "http://schema.org/Audiobook",
                "title": "Moby-Dick",
                "identifier": "urn:isbn:9780000000001",
                "author": ["Herman Melville", {"name": "Ishmael", "role": "narrator"}],
                "publisher": {"name": "Harper & Brothers"},
                "description": "The whale.",
                "language": ["en", "fr"],
                "published": "1851-10-18",
                "duration": 75600.5,
                "tracks": 135,
                "subject": ["Whaling"],
            },
            "links": [{"rel": "self", "href": "manifest.json", "type": "application/audiobook+json"}],
            "readingOrder": [{"href": "track-001.mp3", "type": "audio/mpeg", "duration": 560.0}],
            "toc": [{"href": "track-001.mp3", "title": "Loomings"}],
        })
    }

    #[test]
    fn test_manifest_round_trip_keeps_view_fields() {
        let original: Publication = serde_json::from_value(moby_dick()).unwrap();
        let json = original.to_manifest_json().unwrap();
        let decoded = Publication::from_manifest_json(&json).unwrap();

        assert_eq!(decoded, original);
        let metadata = &decoded.metadata;
        assert_eq!(metadata.title.text(), "Moby-Dick");
        assert_eq!(metadata.authors.iter().map(Contributor::display_name).collect::<Vec<_>>(), ["Herman Melville", "Ishmael"]);
        assert_eq!(metadata.publishers[0].display_name(), "Harper & Brothers");
        assert_eq!(metadata.description.as_deref(), Some("The whale."));
        assert_eq!(metadata.languages, ["en", "fr"]);
        assert_eq!(metadata.identifier.as_deref(), Some("urn:isbn:9780000000001"));
        assert_eq!(metadata.published_at().as_deref(), Some("1851-10-18T00:00:00.000Z"));
        assert_eq!(metadata.duration, Some(75600.5));
        assert_eq!(metadata.track_count(), Some(135));
        assert_eq!(metadata.rdf_type.as_deref(), Some("http://schema.org/Audiobook"));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let publication: Publication = serde_json::from_value(moby_dick()).unwrap();
        let value = publication.to_manifest_value().unwrap();
        assert_eq!(value["toc"][0]["title"], "Loomings");
        assert_eq!(value["metadata"]["subject"], json!(["Whaling"]));
        assert_eq!(value["readingOrder"][0]["duration"], 560.0);
    }

    #[test]
    fn test_manifest_is_two_space_indented() {
        let publication = Publication::from_manifest_json(r#"{"metadata":{"title":"T"}}"#).unwrap();
        let json = publication.to_manifest_json().unwrap();
        assert!(json.starts_with("{\n  \"metadata\": {\n    \"title\": \"T\""));
    }

    #[test]
    fn test_license_is_never_serialized() {
        let license = License::parse(&well_formed_license_json()).unwrap().activate("META-INF/license.lcpl", None);
        let publication = Publication::from_manifest_json(r#"{"metadata":{"title":"T"}}"#)
            .unwrap()
            .with_license(license);
        assert!(publication.is_protected());
        let json = publication.to_manifest_json().unwrap();
        assert!(!json.contains("encryption"));
        let decoded = Publication::from_manifest_json(&json).unwrap();
        assert!(!decoded.is_protected());
    }

    #[test]
    fn test_rejects_non_json() {
        let err = Publication::from_manifest_json("<package/>").unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidManifest);
    }
}
