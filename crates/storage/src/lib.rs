//! Storage backends and on-disk layout for publications.
//!
//! Every publication lives in its own folder below a storage root. The folder
//! holds the original package alongside two derived cache files:
//! `manifest.json` (the serialized manifest) and `license.lcpl` (the DRM
//! license, when the publication carries one). Where that folder is, and what
//! the package file is called, is decided by a [`Locator`].

pub mod backend;
pub mod error;
mod locator;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::locator::{FolderLocator, LICENSE_FILE, Locator, MANIFEST_FILE};
pub use crate::path::{validate as validate_path, validate_identifier};
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
pub type LocatorHandle = Arc<dyn Locator + Send + Sync>;
