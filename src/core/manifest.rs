//! core::manifest
//!
//! Package manifest (`package.json`) reading and modeling.
//!
//! Only the fields the release pipeline needs are modeled: the package
//! name, its version, and the runtime dependency map. The dependency map
//! is ordered by name so delta output is deterministic.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// The manifest file name searched for in a repository.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Errors from manifest reading.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// A parsed package manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Package name
    pub name: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// Runtime dependencies: name → version range
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Parse a manifest from raw JSON text.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(text).map_err(|error| ManifestError::ParseError {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    /// Read the manifest at `dir/package.json`.
    pub fn read(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let text = std::fs::read_to_string(&path).map_err(|source| ManifestError::ReadError {
            path: path.clone(),
            source,
        })?;
        Self::parse(&path, &text)
    }
}

/// Find the nearest manifest at or above `cwd`.
///
/// Walks up the directory tree the way `npm` resolves the enclosing
/// package. Returns the manifest and the directory containing it, or
/// `None` when no manifest exists on the path to the filesystem root.
pub fn find_manifest(cwd: &Path) -> Result<Option<(PathBuf, PackageManifest)>, ManifestError> {
    for dir in cwd.ancestors() {
        let candidate = dir.join(MANIFEST_FILE_NAME);
        if candidate.is_file() {
            let manifest = PackageManifest::read(dir)?;
            return Ok(Some((dir.to_path_buf(), manifest)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_version_and_dependencies() {
        let manifest = PackageManifest::parse(
            Path::new("package.json"),
            r#"{
                "name": "example",
                "version": "1.2.3",
                "dependencies": { "b": "^2.0.0", "a": "~1.0.0" },
                "devDependencies": { "ignored": "1.0.0" }
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.name.as_deref(), Some("example"));
        assert_eq!(manifest.version.as_deref(), Some("1.2.3"));
        let names: Vec<&str> = manifest.dependencies.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn missing_fields_default() {
        let manifest = PackageManifest::parse(Path::new("package.json"), "{}").unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.version.is_none());
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn find_manifest_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            r#"{ "name": "root", "version": "0.1.0" }"#,
        )
        .unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let (found_dir, manifest) = find_manifest(&nested).unwrap().unwrap();
        assert_eq!(found_dir, dir.path());
        assert_eq!(manifest.name.as_deref(), Some("root"));
    }
}
