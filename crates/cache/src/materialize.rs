use crate::error::{ErrorKind, Result};
use crate::locks::IdentifierLocks;
use crate::memory::{CacheEntry, MemoryCache};
use derive_more::Display;
use exn::ResultExt;
use folio_publication::error::ErrorKind as PublicationErrorKind;
use folio_publication::{Active, License, PackageParser, Publication};
use folio_storage::{BackendHandle, LocatorHandle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Origin recorded on licenses that were read from a cache tier rather than
/// from an entry inside the publication package.
pub const DETACHED_LICENSE_ORIGIN: &str = "detached/license.lcpl";

/// Which tier produced a materialized publication.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Deserialized from the manifest held in the [`MemoryCache`]. No I/O was
    /// performed.
    #[display("memory")]
    Memory,
    /// Deserialized from `manifest.json` (and `license.lcpl`) in the
    /// publication folder.
    #[display("disk")]
    Disk,
    /// Neither tier had it; the original package was parsed and the result
    /// written through to both tiers.
    #[display("parsed")]
    Parsed,
}

/// A live publication and the tier it was resolved from.
#[derive(Debug)]
pub struct Materialized {
    pub publication: Publication,
    pub resolution: Resolution,
}

struct Paths {
    manifest: PathBuf,
    license: PathBuf,
    package: PathBuf,
}

/// Resolves publication identifiers to live [`Publication`] objects.
///
/// Lookups go through three tiers, stopping at the first that succeeds:
///
/// 1. **Memory**: the serialized manifest (and license) in the
///    [`MemoryCache`].
/// 2. **Disk**: `manifest.json` and `license.lcpl` in the publication folder.
///    A missing or unreadable license is not an error. When
///    [`write_back_disk_hits`](Self::write_back_disk_hits) is enabled (the
///    default) the memory tier is refilled from what was read.
/// 3. **Package**: the original package is parsed by the [`PackageParser`],
///    then [written through](Self::write_manifest) to both tiers.
///
/// Anything that goes wrong in the first two tiers (missing files, corrupt
/// JSON) is a cache miss. Only a failure to parse the package is returned to
/// the caller, as [`Parse`](ErrorKind::Parse).
///
/// Licenses read from either cache tier are decoded, checked with
/// [`is_well_formed()`](folio_publication::is_well_formed) and activated
/// before being attached. A license that fails any of that is logged and left
/// off; the publication still opens, just without DRM.
pub struct Materializer {
    backend: BackendHandle,
    locator: LocatorHandle,
    parser: Arc<dyn PackageParser>,
    memory: MemoryCache,
    locks: IdentifierLocks,
    write_back_disk_hits: bool,
}

impl Materializer {
    pub fn new(
        backend: BackendHandle,
        locator: LocatorHandle,
        parser: Arc<dyn PackageParser>,
        memory: MemoryCache,
    ) -> Self {
        Self {
            backend,
            locator,
            parser,
            memory,
            locks: IdentifierLocks::default(),
            write_back_disk_hits: true,
        }
    }

    /// Whether publications found on disk are copied into the memory tier.
    pub fn write_back_disk_hits(mut self, enabled: bool) -> Self {
        self.write_back_disk_hits = enabled;
        self
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    /// Forgets everything held in memory for `identifier`.
    ///
    /// Call this when a publication is deleted or re-imported. Files on disk
    /// are left alone; a re-import overwrites them through
    /// [`write_manifest()`](Self::write_manifest).
    pub fn evict(&self, identifier: &str) {
        self.memory.evict(identifier);
    }

    /// Produces a live publication for `identifier`.
    ///
    /// # Errors
    /// - [`InvalidIdentifier`](ErrorKind::InvalidIdentifier) if the
    ///   identifier can't name a publication folder. Nothing is read.
    /// - [`Parse`](ErrorKind::Parse) if both cache tiers missed and the
    ///   package couldn't be parsed.
    #[instrument(skip(self), fields(backend = self.backend.name(), resolution))]
    pub async fn materialize(&self, identifier: &str) -> Result<Materialized> {
        let paths = self.paths(identifier)?;
        let (publication, resolution) = if let Some(publication) = self.from_memory(identifier) {
            (publication, Resolution::Memory)
        } else if let Some(publication) = self.from_disk(identifier, &paths).await {
            (publication, Resolution::Disk)
        } else {
            (self.from_package(identifier, &paths).await?, Resolution::Parsed)
        };
        tracing::Span::current().record("resolution", tracing::field::display(resolution));
        Ok(Materialized { publication, resolution })
    }

    /// Writes `publication` through to both cache tiers.
    ///
    /// The memory entry is replaced with the new manifest and, if the
    /// publication carries a license, its text. Only then are `manifest.json`
    /// (pretty-printed) and `license.lcpl` written to disk. A failed disk write
    /// leaves the memory entry as it is, so later lookups still see the
    /// license.
    #[instrument(skip(self, publication), fields(backend = self.backend.name()))]
    pub async fn write_manifest(&self, identifier: &str, publication: &Publication) -> Result<()> {
        let paths = self.paths(identifier)?;
        let manifest = publication.to_manifest_json().or_raise(|| ErrorKind::Serialize("publication manifest"))?;
        let license = publication
            .license
            .as_ref()
            .map(License::to_json)
            .transpose()
            .or_raise(|| ErrorKind::Serialize("license"))?;

        let _guard = self.locks.lock(identifier).await;
        let entry = match &license {
            Some(license) => CacheEntry::new(manifest.as_str()).with_license(license.as_str()),
            None => CacheEntry::new(manifest.as_str()),
        };
        self.memory.insert(identifier, entry);

        self.backend
            .write(&paths.manifest, manifest.as_bytes())
            .await
            .or_raise(|| ErrorKind::Storage(paths.manifest.clone()))?;
        tracing::debug!(path = %paths.manifest.display(), "Manifest written to disk");
        if let Some(license) = &license {
            self.write_license_file(&paths.license, license).await?;
        }
        Ok(())
    }

    /// Writes `license` to disk, and into the memory entry if one exists.
    ///
    /// The license's own source text is written when it has one, so the file
    /// is byte-for-byte what the provider issued.
    #[instrument(skip(self, license), fields(backend = self.backend.name(), license_id = license.id()))]
    pub async fn write_license(&self, identifier: &str, license: &License<Active>) -> Result<()> {
        let path = self.locator.license_path(identifier).or_raise(|| ErrorKind::InvalidIdentifier(identifier.to_string()))?;
        let json = license.to_json().or_raise(|| ErrorKind::Serialize("license"))?;

        let _guard = self.locks.lock(identifier).await;
        self.write_license_file(&path, &json).await?;
        if !self.memory.set_license(identifier, json) {
            tracing::debug!("No manifest in memory cache, license written to disk only");
        }
        Ok(())
    }

    fn paths(&self, identifier: &str) -> Result<Paths> {
        let invalid = || ErrorKind::InvalidIdentifier(identifier.to_string());
        Ok(Paths {
            manifest: self.locator.manifest_path(identifier).or_raise(invalid)?,
            license: self.locator.license_path(identifier).or_raise(invalid)?,
            package: self.locator.package_path(identifier).or_raise(invalid)?,
        })
    }

    fn from_memory(&self, identifier: &str) -> Option<Publication> {
        let entry = self.memory.get(identifier)?;
        let publication = match Publication::from_manifest_json(entry.manifest()) {
            Ok(publication) => publication,
            Err(err) => {
                tracing::warn!(error = ?err, "Evicting unreadable manifest from memory cache");
                self.memory.evict(identifier);
                return None;
            },
        };
        tracing::debug!("Publication found in memory cache");
        Some(attach_license(publication, entry.license()))
    }

    async fn from_disk(&self, identifier: &str, paths: &Paths) -> Option<Publication> {
        // Held from the first read until the insert; a write-through must not
        // land in between.
        let _guard = if self.write_back_disk_hits { Some(self.locks.lock(identifier).await) } else { None };
        let manifest = match self.backend.read_to_string(&paths.manifest).await {
            Ok(manifest) => manifest,
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %paths.manifest.display(), "No cached manifest on disk");
                return None;
            },
            Err(err) => {
                tracing::warn!(path = %paths.manifest.display(), error = ?err, "Unable to read cached manifest");
                return None;
            },
        };
        let publication = match Publication::from_manifest_json(&manifest) {
            Ok(publication) => publication,
            Err(err) => {
                tracing::warn!(path = %paths.manifest.display(), error = ?err, "Ignoring unreadable cached manifest");
                return None;
            },
        };
        let license = match self.backend.read_to_string(&paths.license).await {
            Ok(license) => Some(license),
            Err(err) if err.is_not_found() => None,
            Err(err) => {
                tracing::debug!(path = %paths.license.display(), error = ?err, "Unable to read cached license");
                None
            },
        };
        let publication = attach_license(publication, license.as_deref());
        tracing::debug!(path = %paths.manifest.display(), "Publication found on disk");

        if self.write_back_disk_hits {
            let entry = match license {
                Some(license) if publication.is_protected() => CacheEntry::new(manifest).with_license(license),
                _ => CacheEntry::new(manifest),
            };
            self.memory.insert(identifier, entry);
        }
        Some(publication)
    }

    async fn from_package(&self, identifier: &str, paths: &Paths) -> Result<Publication> {
        tracing::debug!(path = %paths.package.display(), "Parsing publication package");
        let package = self
            .parser
            .open(&*self.backend, &paths.package)
            .await
            .or_raise(|| ErrorKind::Parse(paths.package.clone()))?;
        let publication = package.release();

        // The publication is already usable; a cache that can't be written
        // only means the next lookup parses again.
        if let Err(err) = self.write_manifest(identifier, &publication).await {
            tracing::warn!(error = ?err, "Unable to write publication through to the cache");
        }
        Ok(publication)
    }

    async fn write_license_file(&self, path: &Path, json: &str) -> Result<()> {
        self.backend.write(path, json.as_bytes()).await.or_raise(|| ErrorKind::Storage(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "License written to disk");
        Ok(())
    }
}

fn attach_license(publication: Publication, payload: Option<&str>) -> Publication {
    match payload.and_then(activate_license) {
        Some(license) => publication.with_license(license),
        None => publication,
    }
}

/// Decodes, checks and activates a license read from a cache tier.
fn activate_license(payload: &str) -> Option<License<Active>> {
    match License::parse(payload) {
        Ok(license) => Some(license.activate(DETACHED_LICENSE_ORIGIN, Some(payload.to_string()))),
        Err(err) if matches!(*err, PublicationErrorKind::MalformedLicense) => {
            tracing::warn!("License is not well-formed, opening publication without it");
            None
        },
        Err(err) => {
            tracing::warn!(error = ?err, "Unable to decode license, opening publication without it");
            None
        },
    }
}
