//! Publication Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A publication error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for publication operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manifest JSON could not be decoded into a publication.
    #[display("invalid publication manifest")]
    InvalidManifest,
    /// The license payload is not JSON, or doesn't match the license shape.
    #[display("invalid license document")]
    InvalidLicense,
    /// The license is JSON but is missing fields every LCP license must carry.
    #[display("license is not well-formed")]
    MalformedLicense,
    /// A typed object could not be turned back into JSON.
    #[display("failed to serialize {_0}")]
    Serialize(#[error(not(source))] &'static str),
    /// The original publication package could not be opened or parsed.
    #[display("unable to parse publication package: {}", _0.display())]
    Package(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The bytes are either valid or they're not; package errors can wrap
        // storage I/O but the storage frame carries that distinction.
        false
    }
}
