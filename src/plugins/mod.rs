//! plugins
//!
//! The sole abstraction over "how this repository stores its version
//! and whether it supports dependency-changelog generation."
//!
//! # Design
//!
//! One [`RepositoryPlugin`] instance is created fresh per repository
//! working directory per release. The trait models required operations
//! (read and bump the version marker) plus optional capabilities as
//! flags with default implementations: a strategy pattern, not a class
//! hierarchy. The trait is async because some implementations invoke
//! subprocesses and network lookups.

mod cdn_hosting;
mod dotnet;
mod factory;
mod node_service;
mod npm;

pub use cdn_hosting::CdnHostingPlugin;
pub use dotnet::DotnetPlugin;
pub use factory::create_plugin;
pub use node_service::NodeServicePlugin;
pub use npm::NpmPlugin;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::Version;
use thiserror::Error;

use crate::core::manifest::ManifestError;
use crate::git::GitError;
use crate::process::ProcessError;

/// Errors from repository plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The repository kind could not be determined from its contents.
    #[error("could not determine the type of repository: {cwd}")]
    UnknownRepositoryType {
        /// The inspected working directory
        cwd: PathBuf,
    },

    /// The version marker could not be read.
    #[error("failed to read version marker: {message}")]
    VersionReadFailure {
        /// What went wrong
        message: String,
    },

    /// The version marker mutation failed.
    ///
    /// This is fatal, and by the time it occurs the changelog has
    /// already been rewritten; the inconsistency is surfaced, never
    /// hidden.
    #[error("failed to update version marker: {message}")]
    VersionMarkerMutationFailure {
        /// What went wrong
        message: String,
    },

    /// A manifest could not be read or parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A git read failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// A subprocess failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Outcome of the optional dependencies-changelog capability.
#[derive(Debug, Clone)]
pub enum DependenciesChangelog {
    /// Rendered entry lines; `None` when nothing changed.
    Entries(Option<String>),
    /// The diff could not be computed; the block is omitted with this
    /// warning and the release continues.
    Warning(String),
}

/// Abstraction over a repository's version storage and capabilities.
#[async_trait]
pub trait RepositoryPlugin: Send + Sync {
    /// Human-readable repository kind for messages.
    fn display_type(&self) -> &'static str;

    /// The repository working directory this plugin operates on.
    fn cwd(&self) -> &Path;

    /// Whether a release of this repository must be followed by a
    /// deployment (reported at the end of a product release).
    fn is_deployment_required(&self) -> bool {
        false
    }

    /// Whether this repository's manifest can receive dependency bumps.
    fn supports_dependency_updates(&self) -> bool {
        false
    }

    /// Whether this plugin can generate a "Dependencies" changelog block.
    fn supports_dependencies_changelog(&self) -> bool {
        false
    }

    /// Read the current version from the repository's version marker.
    async fn current_version(&self) -> Result<Option<String>, PluginError>;

    /// Write `next_version` to the repository's version marker.
    async fn increment_version(&self, next_version: &Version) -> Result<(), PluginError>;

    /// Derive the next version without prompting, for repository kinds
    /// whose policy does not expose a user-chosen version.
    async fn auto_increment_version(&self, _current_version: &Version) -> Option<String> {
        None
    }

    /// Compute the dependencies changelog block against the manifest at
    /// `previous_version_tag`.
    ///
    /// Only called when [`supports_dependencies_changelog`] is true.
    ///
    /// [`supports_dependencies_changelog`]: RepositoryPlugin::supports_dependencies_changelog
    async fn dependencies_changelog(
        &self,
        _previous_version_tag: &str,
    ) -> Result<DependenciesChangelog, PluginError> {
        Ok(DependenciesChangelog::Warning(format!(
            "\"{}\" repositories do not support dependency changelogs",
            self.display_type()
        )))
    }
}
