//! Interface to the full package parser.
//!
//! Parsing an original package (unzipping an EPUB, reading its OPF, finding
//! `META-INF/license.lcpl`, ...) is expensive and lives outside this crate.
//! The cache only falls back to it when neither cache tier can produce a
//! publication.

use crate::error::Result;
use crate::models::Publication;
use async_trait::async_trait;
use folio_storage::StorageBackend;
use std::path::Path;

/// Opens original publication packages.
///
/// Implementations are expected to attach an activated license to the
/// publication themselves when the package contains one.
#[async_trait]
pub trait PackageParser: Send + Sync {
    /// Open and parse the package at `path` (relative to the backend root).
    ///
    /// Failures should be raised as
    /// [`Package`](crate::error::ErrorKind::Package).
    async fn open(&self, storage: &dyn StorageBackend, path: &Path) -> Result<Box<dyn Package>>;
}

/// An opened package, still holding whatever archive handles the parser
/// needed to build the publication.
pub trait Package: Send {
    /// Frees the archive handles and hands back the publication, which no
    /// longer needs the package to stay open.
    fn release(self: Box<Self>) -> Publication;
}
