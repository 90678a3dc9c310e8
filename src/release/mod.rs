//! release
//!
//! The release orchestrator: the fixed sequence of steps that turns a
//! repository's pending changes into a tagged release.
//!
//! # Sequence
//!
//! 1. Resolve and validate the next version against the current one
//! 2. Rewrite the changelog (skipped entirely for pre-releases)
//! 3. Update the repository's version marker
//! 4. Stage, commit, push, tag `v<version>`, push tags (unless `--no-git`)
//!
//! Steps never reorder and there is no rollback: a failure after the
//! changelog write leaves the working tree as evidence of how far the
//! release got.

pub mod product;
pub mod workspace;

use semver::Version;
use thiserror::Error;

use crate::changelog::{self, NextReleaseError};
use crate::core::version::{self, VersionError};
use crate::git::{Git, GitError};
use crate::plugins::{PluginError, RepositoryPlugin};
use crate::ui::progress::with_progress_sync;

/// Errors from releasing one repository.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    NextRelease(#[from] NextReleaseError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Options for releasing one repository.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Candidate next version, validated against the current one
    pub next_version: String,
    /// Release name recorded as a subtitle and in the commit message
    pub release_name: Option<String>,
    /// Whether to commit, push, and tag after the file mutations
    pub git: bool,
}

/// Release the repository behind `plugin`.
///
/// Returns the released version.
pub async fn release_repository(
    plugin: &dyn RepositoryPlugin,
    options: &ReleaseOptions,
) -> Result<Version, ReleaseError> {
    let current_version =
        plugin
            .current_version()
            .await?
            .ok_or_else(|| VersionError::NoCurrentVersion {
                display_type: plugin.display_type().to_string(),
                cwd: plugin.cwd().display().to_string(),
            })?;
    let next_version = version::validate_next(&options.next_version, &current_version, false)?;

    // Pre-releases leave the changelog alone and carry no release name.
    let release_name = if version::pre_release(&next_version).is_some() {
        let _ = with_progress_sync::<_, std::io::Error, _>(
            "Updating CHANGELOG.md",
            "Failed to update CHANGELOG.md",
            |progress| {
                progress.info(format!(
                    "Skipping CHANGELOG.md updates for pre-release version \"{next_version}\""
                ));
                Ok(())
            },
        );
        None
    } else {
        changelog::add_next_release(plugin, &next_version, options.release_name.as_deref())
            .await?;
        options.release_name.as_deref()
    };

    plugin.increment_version(&next_version).await?;

    if options.git {
        let message = match release_name {
            Some(name) => format!("[RELEASE] {next_version} - {name}"),
            None => format!("[RELEASE] {next_version}"),
        };
        let git = Git::open(plugin.cwd())?;
        git.stage_all()?;
        git.commit(&message)?;
        git.push()?;
        git.tag_annotated(&format!("v{next_version}"), &message)?;
        git.push_tags()?;
    } else {
        let _ = with_progress_sync::<_, std::io::Error, _>(
            "Committing release",
            "Failed to commit release",
            |progress| {
                progress.info("Skipping git commit, push, and tag");
                Ok(())
            },
        );
    }

    Ok(next_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::DependenciesChangelog;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct RecordingPlugin {
        cwd: PathBuf,
        current: Option<String>,
        written: Mutex<Option<String>>,
        fail_increment: bool,
    }

    #[async_trait]
    impl RepositoryPlugin for RecordingPlugin {
        fn display_type(&self) -> &'static str {
            "recording"
        }

        fn cwd(&self) -> &Path {
            &self.cwd
        }

        async fn current_version(&self) -> Result<Option<String>, PluginError> {
            Ok(self.current.clone())
        }

        async fn increment_version(&self, next_version: &Version) -> Result<(), PluginError> {
            if self.fail_increment {
                return Err(PluginError::VersionMarkerMutationFailure {
                    message: "marker file is read-only".to_string(),
                });
            }
            *self.written.lock().unwrap() = Some(next_version.to_string());
            Ok(())
        }

        async fn dependencies_changelog(
            &self,
            _previous_version_tag: &str,
        ) -> Result<DependenciesChangelog, PluginError> {
            Ok(DependenciesChangelog::Entries(None))
        }
    }

    fn fixture(dir: &Path) -> RecordingPlugin {
        std::fs::write(
            dir.join("CHANGELOG.md"),
            "# Changelog\n\n## Unreleased\n\n### Added\n\n- feature\n",
        )
        .unwrap();
        RecordingPlugin {
            cwd: dir.to_path_buf(),
            current: Some("1.0.0".to_string()),
            written: Mutex::new(None),
            fail_increment: false,
        }
    }

    #[tokio::test]
    async fn releases_update_changelog_and_version_marker() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = fixture(dir.path());

        let released = release_repository(
            &plugin,
            &ReleaseOptions {
                next_version: "1.1.0".to_string(),
                release_name: None,
                git: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(released, Version::new(1, 1, 0));
        assert_eq!(
            plugin.written.lock().unwrap().as_deref(),
            Some("1.1.0")
        );
        let text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(text.contains("## [1.1.0]"));
    }

    #[tokio::test]
    async fn pre_releases_skip_the_changelog() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = fixture(dir.path());
        let original = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();

        release_repository(
            &plugin,
            &ReleaseOptions {
                next_version: "1.1.0-beta.1".to_string(),
                release_name: Some("ignored".to_string()),
                git: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            original
        );
        assert_eq!(
            plugin.written.lock().unwrap().as_deref(),
            Some("1.1.0-beta.1")
        );
    }

    #[tokio::test]
    async fn failed_version_marker_update_surfaces_after_the_changelog_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut plugin = fixture(dir.path());
        plugin.fail_increment = true;

        let result = release_repository(
            &plugin,
            &ReleaseOptions {
                next_version: "1.1.0".to_string(),
                release_name: None,
                git: false,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ReleaseError::Plugin(
                PluginError::VersionMarkerMutationFailure { .. }
            ))
        ));
        // The changelog was already rewritten; the inconsistency is
        // left in the working tree rather than rolled back.
        let text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(text.contains("## [1.1.0]"));
    }

    #[tokio::test]
    async fn same_version_is_rejected_before_any_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = fixture(dir.path());
        let original = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();

        let result = release_repository(
            &plugin,
            &ReleaseOptions {
                next_version: "1.0.0".to_string(),
                release_name: None,
                git: false,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ReleaseError::Version(VersionError::SameAsCurrent { .. }))
        ));
        assert!(plugin.written.lock().unwrap().is_none());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            original
        );
    }

    #[tokio::test]
    async fn missing_current_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = RecordingPlugin {
            cwd: dir.path().to_path_buf(),
            current: None,
            written: Mutex::new(None),
            fail_increment: false,
        };

        let result = release_repository(
            &plugin,
            &ReleaseOptions {
                next_version: "1.0.0".to_string(),
                release_name: None,
                git: false,
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(ReleaseError::Version(VersionError::NoCurrentVersion { .. }))
        ));
    }
}
