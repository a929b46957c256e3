//! Publication folder layout.

use std::path::PathBuf;

use crate::error::Result;
use crate::path::validate_identifier;

/// Filename of the serialized manifest inside a publication folder.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Filename of the serialized DRM license inside a publication folder.
pub const LICENSE_FILE: &str = "license.lcpl";

/// Maps a publication identifier to where its files live in storage.
///
/// All returned paths are relative to the storage backend root. Only
/// [`publication_dir()`](Self::publication_dir) and
/// [`package_path()`](Self::package_path) need implementing; the cache file
/// paths are derived from the folder.
pub trait Locator: Send + Sync {
    /// Folder containing every file that belongs to the publication.
    fn publication_dir(&self, identifier: &str) -> Result<PathBuf>;

    /// The original publication package (EPUB, audiobook, ...).
    fn package_path(&self, identifier: &str) -> Result<PathBuf>;

    fn manifest_path(&self, identifier: &str) -> Result<PathBuf> {
        Ok(self.publication_dir(identifier)?.join(MANIFEST_FILE))
    }

    fn license_path(&self, identifier: &str) -> Result<PathBuf> {
        Ok(self.publication_dir(identifier)?.join(LICENSE_FILE))
    }
}

/// One folder per publication, named after its identifier.
///
/// ```text
/// <root>/
/// └── 4f9c0e4e-8a52-4c1d-9d6e-3f1d2b7c9a10/
///     ├── book.epub
///     ├── manifest.json
///     └── license.lcpl
/// ```
///
/// # Examples
///
/// ```
/// use folio_storage::{FolderLocator, Locator};
/// use std::path::Path;
///
/// let locator = FolderLocator::new("book.epub");
/// assert_eq!(locator.manifest_path("abc").unwrap(), Path::new("abc/manifest.json"));
/// assert_eq!(locator.package_path("abc").unwrap(), Path::new("abc/book.epub"));
/// ```
#[derive(Debug, Clone)]
pub struct FolderLocator {
    package_file: String,
}
impl FolderLocator {
    pub fn new(package_file: impl Into<String>) -> Self {
        Self { package_file: package_file.into() }
    }
}
impl Default for FolderLocator {
    fn default() -> Self {
        Self::new("book.epub")
    }
}

impl Locator for FolderLocator {
    fn publication_dir(&self, identifier: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(validate_identifier(identifier)?))
    }

    fn package_path(&self, identifier: &str) -> Result<PathBuf> {
        Ok(self.publication_dir(identifier)?.join(&self.package_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn test_cache_files_share_the_publication_folder() {
        let locator = FolderLocator::default();
        let dir = locator.publication_dir("pub-1").unwrap();
        assert_eq!(locator.manifest_path("pub-1").unwrap(), dir.join("manifest.json"));
        assert_eq!(locator.license_path("pub-1").unwrap(), dir.join("license.lcpl"));
        assert_eq!(locator.package_path("pub-1").unwrap(), Path::new("pub-1/book.epub"));
    }

    #[test]
    fn test_custom_package_file() {
        let locator = FolderLocator::new("audiobook.lcpa");
        assert_eq!(locator.package_path("pub-1").unwrap(), Path::new("pub-1/audiobook.lcpa"));
    }

    #[test]
    fn test_rejects_identifiers_that_escape_the_folder() {
        let locator = FolderLocator::default();
        let err = locator.manifest_path("../other").unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidIdentifier(_)));
    }
}
