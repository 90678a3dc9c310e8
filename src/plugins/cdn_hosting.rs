//! plugins::cdn_hosting
//!
//! Plugin for CDN-hosted asset repositories.
//!
//! These are npm-shaped repositories whose artifacts are published to a
//! CDN, so releasing one requires a deployment and the released assets
//! may be depended upon by other repositories.

use std::path::Path;

use async_trait::async_trait;
use semver::Version;

use super::{DependenciesChangelog, NpmPlugin, PluginError, RepositoryPlugin};

/// Plugin for CDN-hosted asset repositories.
#[derive(Debug)]
pub struct CdnHostingPlugin {
    inner: NpmPlugin,
}

impl CdnHostingPlugin {
    pub fn new(cwd: impl Into<std::path::PathBuf>) -> Self {
        Self {
            inner: NpmPlugin::new(cwd),
        }
    }
}

#[async_trait]
impl RepositoryPlugin for CdnHostingPlugin {
    fn display_type(&self) -> &'static str {
        "cdn-hosting"
    }

    fn cwd(&self) -> &Path {
        self.inner.cwd()
    }

    fn is_deployment_required(&self) -> bool {
        true
    }

    fn supports_dependency_updates(&self) -> bool {
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

    async fn dependencies_changelog(
        &self,
        previous_version_tag: &str,
    ) -> Result<DependenciesChangelog, PluginError> {
        self.inner.dependencies_changelog(previous_version_tag).await
    }
}
