use crate::convert::ViewConverter;
use crate::document::DocumentRecord;
use crate::error::{ErrorKind, Result};
use crate::reading::ReadingState;
use crate::view::ViewRecord;
use exn::ResultExt;
use folio_cache::{Materializer, MemoryCache};
use folio_config::Config;
use folio_publication::PackageParser;
use folio_storage::FolderLocator;
use folio_storage::backend::LocalBackend;
use std::sync::Arc;

/// Name of the storage backend in log output.
const BACKEND_NAME: &str = "library";

/// Everything needed to turn document records into views, built once at
/// application start.
///
/// The memory cache lives as long as the library does. [`close()`](Self::close)
/// clears it; the disk tier survives restarts.
pub struct Library {
    materializer: Arc<Materializer>,
    converter: ViewConverter,
}

impl Library {
    /// Opens the publication storage described by `config`, creating the root
    /// folder if it doesn't exist yet.
    ///
    /// Without `reading` state, views never carry a last reading location.
    pub fn open(config: &Config, parser: Arc<dyn PackageParser>, reading: Option<Arc<dyn ReadingState>>) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let backend = LocalBackend::new(BACKEND_NAME, &config.library.root).or_raise(|| ErrorKind::Storage)?;
        let locator = FolderLocator::new(config.library.package_file.as_str());
        let materializer = Materializer::new(Arc::new(backend), Arc::new(locator), parser, MemoryCache::new())
            .write_back_disk_hits(config.cache.write_back_disk_hits);
        let materializer = Arc::new(materializer);

        let converter = match reading {
            Some(reading) => ViewConverter::new(Arc::clone(&materializer)).with_reading_state(reading),
            None => ViewConverter::new(Arc::clone(&materializer)),
        };
        tracing::info!(root = %config.library.root.display(), "Library opened");
        Ok(Self { materializer, converter })
    }

    pub fn materializer(&self) -> &Arc<Materializer> {
        &self.materializer
    }

    pub fn converter(&self) -> &ViewConverter {
        &self.converter
    }

    pub async fn view(&self, document: &DocumentRecord) -> Result<ViewRecord> {
        self.converter.convert(document).await
    }

    /// Drops cached state for a publication that was deleted or re-imported.
    pub fn forget(&self, identifier: &str) {
        self.materializer.evict(identifier);
    }

    pub fn close(self) {
        self.materializer.memory().clear();
        tracing::debug!("Library closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Locator, ReaderRegistry};
    use async_trait::async_trait;
    use folio_cache::Resolution;
    use folio_config::{CacheConfig, LibraryConfig};
    use folio_publication::error::{ErrorKind as PublicationErrorKind, Result as PublicationResult};
    use folio_publication::{Package, Publication};
    use folio_storage::backend::StorageBackend;
    use std::path::{Path, PathBuf};

    /// Treats the "package" as a bare manifest, so tests can build one by hand.
    struct ManifestPackages;
    struct ManifestPackage(Publication);
    impl Package for ManifestPackage {
        fn release(self: Box<Self>) -> Publication {
            self.0
        }
    }
    #[async_trait]
    impl PackageParser for ManifestPackages {
        async fn open(&self, storage: &dyn StorageBackend, path: &Path) -> PublicationResult<Box<dyn Package>> {
            let json = storage
                .read_to_string(path)
                .await
                .or_raise(|| PublicationErrorKind::Package(path.to_path_buf()))?;
            let publication =
                Publication::from_manifest_json(&json).or_raise(|| PublicationErrorKind::Package(path.to_path_buf()))?;
            Ok(Box::new(ManifestPackage(publication)))
        }
    }

    fn config(root: &Path, write_back_disk_hits: bool) -> Config {
        Config {
            library: LibraryConfig { root: root.to_path_buf(), package_file: "book.epub".to_string() },
            cache: CacheConfig { write_back_disk_hits },
        }
    }

    fn document(identifier: &str) -> DocumentRecord {
        DocumentRecord { identifier: identifier.to_string(), title: "Moby-Dick".to_string(), ..Default::default() }
    }

    fn write(path: PathBuf, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_parse_then_cache() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("pub-1/book.epub"), r#"{"metadata": {"title": "Moby-Dick", "author": "Herman Melville"}}"#);
        let library = Library::open(&config(dir.path(), true), Arc::new(ManifestPackages), None).unwrap();

        let view = library.view(&document("pub-1")).await.unwrap();
        assert_eq!(view.authors, ["Herman Melville"]);
        let manifest = std::fs::read_to_string(dir.path().join("pub-1/manifest.json")).unwrap();
        assert!(manifest.contains("\n  \"metadata\": {\n"));

        // Even with the package gone, the cache tiers keep the publication.
        std::fs::remove_file(dir.path().join("pub-1/book.epub")).unwrap();
        let cached = library.materializer().materialize("pub-1").await.unwrap();
        assert_eq!(cached.resolution, Resolution::Memory);
        library.forget("pub-1");
        let cached = library.materializer().materialize("pub-1").await.unwrap();
        assert_eq!(cached.resolution, Resolution::Disk);
    }

    #[tokio::test]
    async fn test_disk_write_back_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("pub-1/manifest.json"), r#"{"metadata": {"title": "Moby-Dick"}}"#);

        let library = Library::open(&config(dir.path(), false), Arc::new(ManifestPackages), None).unwrap();
        library.view(&document("pub-1")).await.unwrap();
        assert!(library.materializer().memory().is_empty());

        let library = Library::open(&config(dir.path(), true), Arc::new(ManifestPackages), None).unwrap();
        library.view(&document("pub-1")).await.unwrap();
        assert_eq!(library.materializer().memory().len(), 1);
        library.close();
    }

    #[tokio::test]
    async fn test_reading_state_is_wired() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("pub-1/manifest.json"), r#"{"metadata": {"title": "Moby-Dick"}}"#);
        let registry = ReaderRegistry::new();
        registry.save_locator("pub-1", Locator::new("chapter-1.xhtml"));

        let library =
            Library::open(&config(dir.path(), true), Arc::new(ManifestPackages), Some(Arc::new(registry))).unwrap();
        let view = library.view(&document("pub-1")).await.unwrap();
        assert_eq!(view.last_reading_location.unwrap().href, "chapter-1.xhtml");
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let err = Library::open(&config(Path::new("relative"), true), Arc::new(ManifestPackages), None).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Config));
    }
}
