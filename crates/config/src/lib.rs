//! Configuration loading and validation.
//!
//! Values are layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults.
//! 2. An optional configuration file. The format is picked from the file
//!    extension: `.toml`, `.json`, `.yaml` or `.yml`.
//! 3. Environment variables prefixed with `FOLIO_`, using `__` between nested
//!    keys (`FOLIO_LIBRARY__ROOT=/srv/publications`).
//!
//! ```toml
//! [library]
//! root = "/srv/publications"
//! package_file = "book.epub"
//!
//! [cache]
//! write_back_disk_hits = true
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "FOLIO_";
/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub library: LibraryConfig,
    pub cache: CacheConfig,
}

/// Where publications are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Folder holding one sub-folder per publication. Must be absolute.
    ///
    /// Defaults to `publications` inside the platform data directory, e.g.
    /// `~/.local/share/folio/publications` on Linux.
    pub root: PathBuf,
    /// Filename of the original package inside each publication folder.
    pub package_file: String,
}
impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            package_file: "book.epub".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Copy publications found on disk into the memory cache.
    pub write_back_disk_hits: bool,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self { write_back_disk_hits: true }
    }
}

/// An empty path when the platform has no home directory; [`Config::validate()`]
/// then asks for the root to be configured explicitly.
fn default_root() -> PathBuf {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.data_dir().join("publications")).unwrap_or_default()
}

impl Config {
    /// Loads and validates configuration from defaults, the optional file at
    /// `path`, and the environment.
    ///
    /// # Errors
    /// - [`NotFound`](ErrorKind::NotFound) if `path` is given but isn't a file.
    /// - [`UnsupportedFormat`](ErrorKind::UnsupportedFormat) for an unknown
    ///   file extension.
    /// - [`Load`](ErrorKind::Load) if any layer fails to parse or a value has
    ///   the wrong type.
    /// - [`Invalid`](ErrorKind::Invalid) from [`validate()`](Self::validate).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = merge_file(figment, path)?;
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(root = %config.library.root.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let root = &self.library.root;
        if root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("library root is not set"));
        }
        if !root.is_absolute() {
            exn::bail!(ErrorKind::Invalid("library root must be an absolute path"));
        }
        let package_file = &self.library.package_file;
        if package_file.is_empty() {
            exn::bail!(ErrorKind::Invalid("package file name is empty"));
        }
        if package_file.contains(['/', '\\']) || package_file == "." || package_file == ".." {
            exn::bail!(ErrorKind::Invalid("package file name must be a plain file name"));
        }
        Ok(())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let figment = match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    };
    tracing::info!(path = %path.display(), "Reading configuration file");
    Ok(figment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn config(root: &str, package_file: &str) -> Config {
        Config {
            library: LibraryConfig { root: PathBuf::from(root), package_file: package_file.to_string() },
            cache: CacheConfig::default(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.library.package_file, "book.epub");
        assert!(config.cache.write_back_disk_hits);
        if !config.library.root.as_os_str().is_empty() {
            assert!(config.library.root.ends_with("publications"));
        }
    }

    #[test]
    fn test_validate_accepts_absolute_root() {
        config("/srv/publications", "book.epub").validate().unwrap();
    }

    #[rstest]
    #[case::empty_root("", "book.epub")]
    #[case::relative_root("publications", "book.epub")]
    #[case::empty_package_file("/srv/publications", "")]
    #[case::nested_package_file("/srv/publications", "sub/book.epub")]
    #[case::parent_package_file("/srv/publications", "..")]
    fn test_validate_rejects(#[case] root: &str, #[case] package_file: &str) {
        let err = config(root, package_file).validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    // Every test that calls `load()` runs inside a `Jail`, so environment
    // variables set by one never leak into another.

    #[rstest]
    #[case::toml("folio.toml", "[library]\nroot = \"/srv/books\"\npackage_file = \"pub.epub\"\n")]
    #[case::json("folio.json", r#"{"library": {"root": "/srv/books", "package_file": "pub.epub"}}"#)]
    #[case::yaml("folio.yaml", "library:\n  root: /srv/books\n  package_file: pub.epub\n")]
    #[case::yml("folio.YML", "library:\n  root: /srv/books\n  package_file: pub.epub\n")]
    fn test_load_file(#[case] filename: &str, #[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(filename, contents)?;
            let config = Config::load(Some(Path::new(filename))).unwrap();
            assert_eq!(config.library.root, Path::new("/srv/books"));
            assert_eq!(config.library.package_file, "pub.epub");
            assert!(config.cache.write_back_disk_hits);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("folio.toml", "[library]\nroot = \"/srv/books\"\n\n[cache]\nwrite_back_disk_hits = true\n")?;
            jail.set_env("FOLIO_LIBRARY__ROOT", "/mnt/books");
            jail.set_env("FOLIO_CACHE__WRITE_BACK_DISK_HITS", "false");
            let config = Config::load(Some(Path::new("folio.toml"))).unwrap();
            assert_eq!(config.library.root, Path::new("/mnt/books"));
            assert_eq!(config.library.package_file, "book.epub");
            assert!(!config.cache.write_back_disk_hits);
            Ok(())
        });
    }

    #[test]
    fn test_load_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("FOLIO_LIBRARY__ROOT", "/mnt/books");
            let config = Config::load(None).unwrap();
            assert_eq!(config.library.root, Path::new("/mnt/books"));
            Ok(())
        });
    }

    #[test]
    fn test_load_validates() {
        Jail::expect_with(|jail| {
            jail.set_env("FOLIO_LIBRARY__ROOT", "relative/books");
            let err = Config::load(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_wrong_types() {
        Jail::expect_with(|jail| {
            jail.create_file("folio.toml", "[cache]\nwrite_back_disk_hits = \"sometimes\"\n")?;
            jail.set_env("FOLIO_LIBRARY__ROOT", "/mnt/books");
            let err = Config::load(Some(Path::new("folio.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[rstest]
    #[case::missing("missing.toml", false)]
    #[case::unknown_extension("folio.ini", true)]
    fn test_load_rejects_file(#[case] filename: &str, #[case] create: bool) {
        Jail::expect_with(|jail| {
            if create {
                jail.create_file(filename, "[library]\n")?;
            }
            let err = Config::load(Some(Path::new(filename))).unwrap_err();
            match &*err {
                ErrorKind::NotFound(path) => assert!(!create && path == Path::new(filename)),
                ErrorKind::UnsupportedFormat(path) => assert!(create && path == Path::new(filename)),
                other => panic!("unexpected error: {other}"),
            }
            Ok(())
        });
    }
}
