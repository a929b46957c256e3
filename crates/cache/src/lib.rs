//! Two-tier cache for publication manifests.
//!
//! Turning a stored publication into a live [`Publication`] object means
//! parsing its original package, which is slow. This crate keeps the result
//! of that work around in two places:
//!
//! - **Memory**: a [`MemoryCache`] of serialized manifest (and license) text,
//!   keyed by publication identifier.
//! - **Disk**: `manifest.json` and `license.lcpl` written next to the
//!   original package in the publication's folder.
//!
//! The [`Materializer`] consults memory, then disk, and only then asks the
//! [`PackageParser`](folio_publication::PackageParser) to parse the package,
//! writing the result through to both tiers. Neither tier is a source of
//! truth; deleting either only costs a re-parse.
//!
//! [`Publication`]: folio_publication::Publication

pub mod error;
mod locks;
mod materialize;
mod memory;

pub use crate::materialize::{DETACHED_LICENSE_ORIGIN, Materialized, Materializer, Resolution};
pub use crate::memory::{CacheEntry, MemoryCache};
