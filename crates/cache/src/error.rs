//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The identifier can't be mapped onto a publication folder.
    #[display("invalid publication identifier: {_0:?}")]
    InvalidIdentifier(#[error(not(source))] String),
    /// Neither cache tier had the publication, and its package couldn't be
    /// parsed either. There is nothing left to fall back to.
    #[display("unable to parse publication package: {}", _0.display())]
    Parse(#[error(not(source))] PathBuf),
    /// A publication or license couldn't be serialized for caching.
    #[display("failed to serialize {_0} for caching")]
    Serialize(#[error(not(source))] &'static str),
    /// A cache file couldn't be written.
    #[display("unable to write cache file: {}", _0.display())]
    Storage(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
