//! Where readers left off.
//!
//! The reading position lives in application state owned by the reader
//! windows, not in the library. The view converter only asks one question of
//! it ("where was this publication last read?") through [`ReadingState`],
//! and any level of that state may be missing.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A position inside a publication, as saved by a reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locator {
    pub href: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub locations: Locations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<LocatorText>,
}
impl Locator {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            title: None,
            locations: Locations::default(),
            text: None,
        }
    }

    pub fn with_progression(mut self, progression: f64) -> Self {
        self.locations.progression = Some(progression);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<String>,
    /// Progression within the resource, from 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Progression within the whole publication, from 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_progression: Option<f64>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Text surrounding the position, for display in bookmark lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Registry entry for a publication that has been opened in a reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderEntry {
    /// Absent until the reader has saved any state.
    pub reader_state: Option<ReaderState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderState {
    pub locator: Option<Locator>,
}

/// Read-only view of the reader registry.
pub trait ReadingState: Send + Sync {
    /// Snapshot of the registry entry for `identifier`, if one exists.
    fn reader(&self, identifier: &str) -> Option<ReaderEntry>;

    /// Last saved reading position for `identifier`.
    fn last_reading_location(&self, identifier: &str) -> Option<Locator> {
        self.reader(identifier)?.reader_state?.locator
    }
}

/// In-process reader registry, keyed by publication identifier.
///
/// Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct ReaderRegistry {
    readers: Arc<RwLock<HashMap<String, ReaderEntry>>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a reader for `identifier` without any saved state, keeping
    /// existing state if the publication was already registered.
    pub fn open(&self, identifier: &str) {
        self.readers.write().entry(identifier.to_string()).or_default();
    }

    pub fn save_state(&self, identifier: &str, state: ReaderState) {
        self.readers.write().entry(identifier.to_string()).or_default().reader_state = Some(state);
    }

    pub fn save_locator(&self, identifier: &str, locator: Locator) {
        self.save_state(identifier, ReaderState { locator: Some(locator) });
    }

    pub fn remove(&self, identifier: &str) {
        self.readers.write().remove(identifier);
    }
}

impl ReadingState for ReaderRegistry {
    fn reader(&self, identifier: &str) -> Option<ReaderEntry> {
        self.readers.read().get(identifier).cloned()
    }
}
