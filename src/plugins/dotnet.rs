//! plugins::dotnet
//!
//! Plugin for .NET repositories.
//!
//! The version marker is the `<PackageVersion>` element of the project
//! file. Bumping rewrites `<PackageVersion>` to the full semver string
//! and `<AssemblyVersion>` to its four-component form, where the fourth
//! component is the pre-release sequence number (`0` for stable
//! releases). Element values are replaced in place; the rest of the
//! project file is left byte-for-byte untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::Version;

use super::{PluginError, RepositoryPlugin};
use crate::core::version;

const PACKAGE_VERSION_ELEMENT: &str = "PackageVersion";
const ASSEMBLY_VERSION_ELEMENT: &str = "AssemblyVersion";

/// Plugin for .NET repositories.
#[derive(Debug)]
pub struct DotnetPlugin {
    cwd: PathBuf,
    project_file: PathBuf,
}

impl DotnetPlugin {
    pub fn new(cwd: impl Into<PathBuf>, project_file: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let project_file = cwd.join(project_file.into());
        Self { cwd, project_file }
    }

    /// Locate a `.csproj` in `cwd` or exactly one level below it, the
    /// usual solution layout.
    pub fn discover_project_file(cwd: &Path) -> Option<PathBuf> {
        fn csproj_in(dir: &Path) -> Option<PathBuf> {
            let entries = std::fs::read_dir(dir).ok()?;
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "csproj") {
                    return Some(path);
                }
            }
            None
        }

        if let Some(found) = csproj_in(cwd) {
            return Some(found);
        }
        let entries = std::fs::read_dir(cwd).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(found) = csproj_in(&path) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn read_project_file(&self) -> Result<String, PluginError> {
        std::fs::read_to_string(&self.project_file).map_err(|error| {
            PluginError::VersionReadFailure {
                message: format!(
                    "could not read project file '{}': {error}",
                    self.project_file.display()
                ),
            }
        })
    }
}

/// The assembly version is always four components; the fourth carries
/// the pre-release sequence so pre-releases of the same patch version
/// produce distinct assemblies.
fn assembly_version(next_version: &Version) -> String {
    let sequence = version::pre_release(next_version)
        .map(|pre| pre.sequence)
        .unwrap_or(0);
    format!(
        "{}.{}.{}.{}",
        next_version.major, next_version.minor, next_version.patch, sequence
    )
}

/// The text between `<element>` and `</element>`, when both occur.
fn element_value<'a>(document: &'a str, element: &str) -> Option<&'a str> {
    let open = format!("<{element}>");
    let close = format!("</{element}>");
    let start = document.find(&open)? + open.len();
    let end = document[start..].find(&close)? + start;
    Some(&document[start..end])
}

/// Replace the text between `<element>` and `</element>` with `value`.
fn replace_element_value(document: &str, element: &str, value: &str) -> Option<String> {
    let open = format!("<{element}>");
    let close = format!("</{element}>");
    let start = document.find(&open)? + open.len();
    let end = document[start..].find(&close)? + start;
    Some(format!(
        "{}{}{}",
        &document[..start],
        value,
        &document[end..]
    ))
}

#[async_trait]
impl RepositoryPlugin for DotnetPlugin {
    fn display_type(&self) -> &'static str {
        "dotnet"
    }

    fn cwd(&self) -> &Path {
        &self.cwd
    }

    async fn current_version(&self) -> Result<Option<String>, PluginError> {
        if !self.project_file.is_file() {
            return Ok(None);
        }
        let document = self.read_project_file()?;
        Ok(element_value(&document, PACKAGE_VERSION_ELEMENT).map(|value| value.trim().to_string()))
    }

    async fn increment_version(&self, next_version: &Version) -> Result<(), PluginError> {
        let document = self.read_project_file()?;

        let updated = replace_element_value(
            &document,
            PACKAGE_VERSION_ELEMENT,
            &next_version.to_string(),
        )
        .ok_or_else(|| PluginError::VersionMarkerMutationFailure {
            message: format!(
                "project file '{}' has no <{PACKAGE_VERSION_ELEMENT}> element",
                self.project_file.display()
            ),
        })?;

        // AssemblyVersion is optional; when absent only PackageVersion
        // is rewritten.
        let updated = replace_element_value(
            &updated,
            ASSEMBLY_VERSION_ELEMENT,
            &assembly_version(next_version),
        )
        .unwrap_or(updated);

        std::fs::write(&self.project_file, updated).map_err(|error| {
            PluginError::VersionMarkerMutationFailure {
                message: format!(
                    "could not write project file '{}': {error}",
                    self.project_file.display()
                ),
            }
        })
    }
}
