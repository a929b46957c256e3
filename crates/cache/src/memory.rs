//! In-process tier of the publication cache.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cached serialized forms of one publication.
///
/// A license is only ever cached alongside a manifest; there is no way to
/// build an entry without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    manifest: Arc<str>,
    license: Option<Arc<str>>,
}
impl CacheEntry {
    pub fn new(manifest: impl Into<Arc<str>>) -> Self {
        Self { manifest: manifest.into(), license: None }
    }

    pub fn with_license(mut self, license: impl Into<Arc<str>>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }
}

/// Unbounded map from publication identifier to its [`CacheEntry`].
///
/// Cloning is cheap and every clone shares the same entries, so one cache
/// created at application start can be handed to whatever needs it. Nothing
/// expires on its own: entries go away through [`evict()`](Self::evict) (the
/// document was deleted or re-imported) or [`clear()`](Self::clear) (shutdown).
///
/// # Examples
///
/// ```
/// use folio_cache::MemoryCache;
///
/// let cache = MemoryCache::new();
/// cache.set_license("pub-1", "{}");
/// assert!(cache.get("pub-1").is_none());
///
/// cache.set_manifest("pub-1", r#"{"metadata":{"title":"T"}}"#);
/// cache.set_license("pub-1", "{}");
/// assert_eq!(cache.get("pub-1").unwrap().license(), Some("{}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: &str) -> Option<CacheEntry> {
        self.entries.read().get(identifier).cloned()
    }

    /// Starts a new cache generation for `identifier`: any previously cached
    /// manifest and license are dropped.
    pub fn set_manifest(&self, identifier: &str, manifest: impl Into<Arc<str>>) {
        self.insert(identifier, CacheEntry::new(manifest));
    }

    /// Replaces the whole entry for `identifier`.
    pub fn insert(&self, identifier: &str, entry: CacheEntry) {
        self.entries.write().insert(identifier.to_string(), entry);
    }

    /// Attaches a license to an existing entry.
    ///
    /// Does nothing (and returns `false`) if no manifest is cached for
    /// `identifier`.
    pub fn set_license(&self, identifier: &str, license: impl Into<Arc<str>>) -> bool {
        match self.entries.write().get_mut(identifier) {
            Some(entry) => {
                entry.license = Some(license.into());
                true
            },
            None => false,
        }
    }

    pub fn evict(&self, identifier: &str) {
        if self.entries.write().remove(identifier).is_some() {
            tracing::debug!(identifier, "Evicted publication from memory cache");
        }
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_manifest_then_license() {
        let cache = MemoryCache::new();
        cache.set_manifest("pub-1", "manifest");
        assert!(cache.set_license("pub-1", "license"));
        let entry = cache.get("pub-1").unwrap();
        assert_eq!(entry.manifest(), "manifest");
        assert_eq!(entry.license(), Some("license"));
    }

    #[test]
    fn test_license_without_manifest_is_ignored() {
        let cache = MemoryCache::new();
        assert!(!cache.set_license("pub-1", "license"));
        assert!(cache.get("pub-1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_manifest_drops_previous_license() {
        let cache = MemoryCache::new();
        cache.set_manifest("pub-1", "v1");
        cache.set_license("pub-1", "license");
        cache.set_manifest("pub-1", "v2");
        assert_eq!(cache.get("pub-1").unwrap(), CacheEntry::new("v2"));
    }

    #[rstest]
    #[case::absent(None, None)]
    #[case::manifest_only(Some("manifest"), None)]
    #[case::with_license(Some("manifest"), Some("license"))]
    fn test_evict_from_any_state(#[case] manifest: Option<&str>, #[case] license: Option<&str>) {
        let cache = MemoryCache::new();
        cache.set_manifest("other", "untouched");
        if let Some(manifest) = manifest {
            cache.set_manifest("pub-1", manifest);
        }
        if let Some(license) = license {
            cache.set_license("pub-1", license);
        }
        cache.evict("pub-1");
        assert!(cache.get("pub-1").is_none());
        // Idempotent
        cache.evict("pub-1");
        assert!(cache.get("pub-1").is_none());
        assert_eq!(cache.get("other").unwrap().manifest(), "untouched");
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = MemoryCache::new();
        let handle = cache.clone();
        handle.set_manifest("pub-1", "manifest");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(handle.is_empty());
    }
}
