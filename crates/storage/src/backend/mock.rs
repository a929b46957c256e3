//! In-memory storage backend for testing.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// In-memory storage backend for testing.
///
/// Files are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation.
///
/// # Examples
///
/// ```
/// use folio_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([
///     ("pub-1/book.epub", b"PK..."),
/// ]);
/// assert!(backend.exists(Path::new("pub-1/book.epub")).await?);
///
/// backend.write(Path::new("pub-1/manifest.json"), b"{}").await?;
/// assert!(backend.exists(Path::new("pub-1/manifest.json")).await?);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<PathBuf, Vec<u8>>>,
    read_only: bool,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            read_only: false,
        }
    }

    /// Reject every write and delete with
    /// [`PermissionDenied`](ErrorKind::PermissionDenied), like a read-only
    /// mount would.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Snapshot of a stored file, bypassing path validation errors.
    pub async fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let validated = validate_path(path.as_ref()).ok()?;
        self.storage.read().await.get(&validated).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let validated = validate_path(path)?;
        Ok(self.storage.read().await.contains_key(&validated))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let validated = validate_path(path)?;
        match self.storage.read().await.get(&validated) {
            Some(data) => Ok(data.clone()),
            None => exn::bail!(ErrorKind::NotFound(validated)),
        }
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let validated = validate_path(path)?;
        if self.read_only {
            exn::bail!(ErrorKind::PermissionDenied(validated));
        }
        self.storage.write().await.insert(validated, data.to_vec());
        Ok(())
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        let validated = validate_path(path)?;
        if self.read_only {
            exn::bail!(ErrorKind::PermissionDenied(validated));
        }
        match self.storage.write().await.remove(&validated) {
            Some(_) => Ok(()),
            None => exn::bail!(ErrorKind::NotFound(validated)),
        }
    }
}
