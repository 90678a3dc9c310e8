//! plugins::node_service
//!
//! Plugin for deployed Node services.
//!
//! Version storage and dependency changelogs are identical to plain npm
//! packages, so those operations delegate. Services differ in policy:
//! every release requires a deployment, releases never receive dependency
//! bumps from other repositories, and the next version is always an
//! automatic minor increment rather than a prompted choice.

use std::path::Path;

use async_trait::async_trait;
use semver::Version;

use super::{DependenciesChangelog, NpmPlugin, PluginError, RepositoryPlugin};

/// Plugin for Node service repositories.
#[derive(Debug)]
pub struct NodeServicePlugin {
    inner: NpmPlugin,
}

impl NodeServicePlugin {
    pub fn new(cwd: impl Into<std::path::PathBuf>) -> Self {
        Self {
            inner: NpmPlugin::new(cwd),
        }
    }
}

#[async_trait]
impl RepositoryPlugin for NodeServicePlugin {
    fn display_type(&self) -> &'static str {
        "node-service"
    }

    fn cwd(&self) -> &Path {
        self.inner.cwd()
    }

    fn is_deployment_required(&self) -> bool {
        true
    }

    fn supports_dependencies_changelog(&self) -> bool {
        true
    }

    async fn current_version(&self) -> Result<Option<String>, PluginError> {
        self.inner.current_version().await
    }

    async fn increment_version(&self, next_version: &Version) -> Result<(), PluginError> {
        self.inner.increment_version(next_version).await
    }

    /// Services always release as the next minor version.
    async fn auto_increment_version(&self, current_version: &Version) -> Option<String> {
        Some(Version::new(current_version.major, current_version.minor + 1, 0).to_string())
    }

    async fn dependencies_changelog(
        &self,
        previous_version_tag: &str,
    ) -> Result<DependenciesChangelog, PluginError> {
        self.inner.dependencies_changelog(previous_version_tag).await
    }
}
