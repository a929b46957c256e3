//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration was rejected before anything was opened.
    #[display("invalid library configuration")]
    Config,
    /// The storage root couldn't be opened.
    #[display("unable to open publication storage")]
    Storage,
    /// The publication couldn't be produced from any cache tier or its package.
    #[display("unable to materialize publication")]
    Materialize,
    #[display("failed to serialize publication view")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
