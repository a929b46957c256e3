//! Typed publication manifests and LCP licenses.
//!
//! A [`Publication`] is the in-memory form of a Readium-style web publication
//! manifest. It round-trips through JSON without losing fields it doesn't
//! model: anything unknown is kept in an `additional` map and written back
//! out verbatim. A DRM license, when present, rides along on the publication
//! but is never part of the manifest JSON; it is stored and serialized on its
//! own (see [`License`]).
//!
//! Producing a publication from scratch is the job of a [`PackageParser`],
//! which opens the original package (an EPUB, an audiobook archive, ...)
//! and hands back a [`Package`] to release once the publication has been
//! extracted.

pub mod error;
pub mod license;
pub mod models;
mod package;

pub use crate::license::{Active, License, LicenseDocument, Parsed, is_well_formed};
pub use crate::models::{Contributor, Link, LocalizedString, Metadata, Publication};
pub use crate::package::{Package, PackageParser};
