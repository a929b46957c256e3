use super::one_or_many;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource reference inside a manifest (reading order item, cover image,
/// alternate format, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(
        default,
        rename = "rel",
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Duration in seconds, for audio/video resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}
impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            rels: Vec::new(),
            title: None,
            duration: None,
            additional: Map::new(),
        }
    }
}
