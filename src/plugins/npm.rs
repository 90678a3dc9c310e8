//! plugins::npm
//!
//! Plugin for plain npm package repositories.
//!
//! The version marker is the `version` field of `package.json`. Bumping
//! it delegates to `npm version <next> --no-git-tag-version` so npm's own
//! rules (package-lock synchronization included) apply. Dependency
//! changelogs compare the manifest pinned at the previous release tag
//! against the working copy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::Version;

use super::{DependenciesChangelog, PluginError, RepositoryPlugin};
use crate::core::manifest::{self, PackageManifest, MANIFEST_FILE_NAME};
use crate::diff::{diff_manifests, render_deltas, LinkResolver};
use crate::git::{Git, GitError};
use crate::process;

/// Plugin for npm package repositories.
#[derive(Debug)]
pub struct NpmPlugin {
    cwd: PathBuf,
    links: LinkResolver,
}

impl NpmPlugin {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            links: LinkResolver::new(),
        }
    }

    /// Plugin with a custom link resolver (used by tests).
    pub fn with_links(cwd: impl Into<PathBuf>, links: LinkResolver) -> Self {
        Self {
            cwd: cwd.into(),
            links,
        }
    }
}

#[async_trait]
impl RepositoryPlugin for NpmPlugin {
    fn display_type(&self) -> &'static str {
        "npm"
    }

    fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn supports_dependency_updates(&self) -> bool {
        true
    }

    fn supports_dependencies_changelog(&self) -> bool {
        true
    }

    async fn current_version(&self) -> Result<Option<String>, PluginError> {
        let Some((_, manifest)) = manifest::find_manifest(&self.cwd)? else {
            return Ok(None);
        };
        Ok(manifest.version)
    }

    async fn increment_version(&self, next_version: &Version) -> Result<(), PluginError> {
        let version = next_version.to_string();
        process::run(
            "npm",
            &["version", &version, "--no-git-tag-version"],
            &self.cwd,
        )
        .map_err(|error| PluginError::VersionMarkerMutationFailure {
            message: error.to_string(),
        })?;
        Ok(())
    }

    async fn dependencies_changelog(
        &self,
        previous_version_tag: &str,
    ) -> Result<DependenciesChangelog, PluginError> {
        let git = Git::open(&self.cwd)?;
        let previous_text = match git.show_file_at(previous_version_tag, MANIFEST_FILE_NAME) {
            Ok(text) => text,
            Err(GitError::RefNotFound { revision }) => {
                return Ok(DependenciesChangelog::Warning(format!(
                    "tag \"{revision}\" was not found; releases are expected to be tagged \
                     \"v<version>\""
                )));
            }
            Err(GitError::FileNotFoundAtRevision { revision, path }) => {
                return Ok(DependenciesChangelog::Warning(format!(
                    "\"{path}\" does not exist at tag \"{revision}\""
                )));
            }
            Err(error) => return Err(error.into()),
        };

        let previous =
            PackageManifest::parse(&self.cwd.join(MANIFEST_FILE_NAME), &previous_text)?;
        let current = PackageManifest::read(&self.cwd)?;

        let deltas = diff_manifests(&previous, &current);
        if deltas.is_empty() {
            return Ok(DependenciesChangelog::Entries(None));
        }
        let rendered = render_deltas(&deltas, &self.links).await;
        Ok(DependenciesChangelog::Entries(Some(rendered)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_version_from_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            r#"{ "name": "example", "version": "1.2.3" }"#,
        )
        .unwrap();

        let plugin = NpmPlugin::new(dir.path());
        assert_eq!(
            plugin.current_version().await.unwrap().as_deref(),
            Some("1.2.3")
        );
    }

    #[tokio::test]
    async fn missing_manifest_yields_no_version() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = NpmPlugin::new(dir.path().join("nonexistent"));
        assert_eq!(plugin.current_version().await.unwrap(), None);
    }
}
