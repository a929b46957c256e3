//! Path and identifier validation.
//!
//! Storage paths are always relative to a backend root. Anything that could
//! resolve outside of that root is rejected before it reaches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a storage path.
///
/// `.` components and repeated separators are dropped, `..` is resolved
/// against the components seen so far and rejected if it would climb above
/// the root. Null bytes and Windows prefixes are rejected outright, as is a
/// path that normalizes to nothing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use folio_storage::validate_path;
/// assert_eq!(validate_path("pub-1/./manifest.json").unwrap(), Path::new("pub-1/manifest.json"));
/// assert_eq!(validate_path("/pub-1/license.lcpl").unwrap(), Path::new("pub-1/license.lcpl"));
/// assert!(validate_path("pub-1/../../etc/passwd").is_err());
/// assert!(validate_path("").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_path_buf());
    let mut normalized: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) if segment.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(segment) => normalized.push(segment),
            Component::CurDir | Component::RootDir => {},
            Component::ParentDir => {
                if normalized.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
            Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    if normalized.is_empty() {
        exn::bail!(invalid());
    }
    Ok(normalized.into_iter().collect())
}

/// Validates a publication identifier for use as a single folder name.
///
/// Identifiers come from the persistence layer (usually UUIDs), but nothing
/// stops a corrupted record from containing separators, so they are checked
/// before being joined onto any path.
///
/// # Examples
///
/// ```
/// use folio_storage::validate_identifier;
/// assert!(validate_identifier("4f9c0e4e-8a52-4c1d-9d6e-3f1d2b7c9a10").is_ok());
/// assert!(validate_identifier("nested/id").is_err());
/// assert!(validate_identifier("..").is_err());
/// ```
pub fn validate_identifier(identifier: &str) -> Result<&str> {
    let valid = !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\', '\0']);
    if !valid {
        exn::bail!(ErrorKind::InvalidIdentifier(identifier.to_string()));
    }
    Ok(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pub-1/manifest.json", "pub-1/manifest.json")]
    #[case("pub-1//manifest.json", "pub-1/manifest.json")]
    #[case("./pub-1/./license.lcpl", "pub-1/license.lcpl")]
    #[case("pub-1/tmp/../book.epub", "pub-1/book.epub")]
    #[case("pub-1/", "pub-1")]
    fn test_valid_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("//")]
    #[case("..")]
    #[case("../manifest.json")]
    #[case("pub-1/../../manifest.json")]
    #[case("pub\0-1/manifest.json")]
    fn test_invalid_paths(#[case] input: &str) {
        let err = validate(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[rstest]
    #[case("4f9c0e4e-8a52-4c1d-9d6e-3f1d2b7c9a10")]
    #[case("book.with.dots")]
    #[case("...")]
    fn test_valid_identifiers(#[case] identifier: &str) {
        assert_eq!(validate_identifier(identifier).unwrap(), identifier);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("a\0b")]
    fn test_invalid_identifiers(#[case] identifier: &str) {
        let err = validate_identifier(identifier).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidIdentifier(_)));
    }
}
