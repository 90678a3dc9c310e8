//! diff::links
//!
//! Best-effort link decoration for dependency changelog entries.
//!
//! Names link to their npm package page, versions to a matching GitHub
//! release (trying the bare version then the `v`-prefixed tag) or to the
//! project's hosted changelog. Every lookup failure (network errors,
//! missing metadata, unknown tags) degrades to plain text; decoration
//! can never abort a release.
//!
//! Base URLs are injectable so tests can point the resolver at a mock
//! server.

use std::time::Duration;

use reqwest::Client;

const DEFAULT_NPM_REGISTRY_BASE: &str = "https://registry.npmjs.org";
const DEFAULT_NPM_PACKAGE_BASE: &str = "https://www.npmjs.com/package";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves markdown links for dependency names and versions.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    client: Client,
    npm_registry_base: String,
    npm_package_base: String,
    github_api_base: String,
    github_token: Option<String>,
    enabled: bool,
}

impl LinkResolver {
    /// Resolver against the public npm registry and GitHub API.
    ///
    /// A GitHub token is read from `GITHUB_OAUTH_TOKEN` when present to
    /// raise the unauthenticated rate limit.
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .user_agent(concat!("shipwright/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            npm_registry_base: DEFAULT_NPM_REGISTRY_BASE.to_string(),
            npm_package_base: DEFAULT_NPM_PACKAGE_BASE.to_string(),
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            github_token: std::env::var("GITHUB_OAUTH_TOKEN").ok(),
            enabled: true,
        }
    }

    /// Resolver that performs no lookups; every decoration falls back
    /// to plain text.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Resolver against custom base URLs (used by tests).
    pub fn with_bases(
        npm_registry_base: impl Into<String>,
        npm_package_base: impl Into<String>,
        github_api_base: impl Into<String>,
    ) -> Self {
        Self {
            npm_registry_base: npm_registry_base.into(),
            npm_package_base: npm_package_base.into(),
            github_api_base: github_api_base.into(),
            ..Self::new()
        }
    }

    /// Markdown for a dependency name: linked to its npm package page
    /// when that page responds, plain otherwise.
    pub async fn name_markdown(&self, name: &str) -> String {
        let package_url = format!("{}/{}", self.npm_package_base, name);
        if self.url_healthy(&package_url).await {
            format!("[{name}]({package_url})")
        } else {
            name.to_string()
        }
    }

    /// Markdown for a version: linked to the matching GitHub release,
    /// falling back to the project changelog, then to plain text.
    pub async fn version_markdown(&self, name: &str, version: &semver::Version) -> String {
        let url = match self.release_url(name, version).await {
            Some(url) => Some(url),
            None => self.changelog_url(name).await,
        };
        match url {
            Some(url) => format!("[{version}]({url})"),
            None => version.to_string(),
        }
    }

    /// URL of the project's hosted changelog, when it exists.
    pub async fn changelog_url(&self, name: &str) -> Option<String> {
        let project_url = self.project_url(name).await?;
        let changelog_url = format!("{project_url}/blob/master/CHANGELOG.md");
        self.url_healthy(&changelog_url)
            .await
            .then_some(changelog_url)
    }

    /// URL of the GitHub release tagged with this version, trying the
    /// bare version then the `v`-prefixed variant.
    pub async fn release_url(&self, name: &str, version: &semver::Version) -> Option<String> {
        let project_url = self.project_url(name).await?;
        let mut segments = project_url.rsplit('/');
        let repo = segments.next()?;
        let owner = segments.next()?;

        for tag in [version.to_string(), format!("v{version}")] {
            let api_url = format!(
                "{}/repos/{}/{}/releases/tags/{}",
                self.github_api_base, owner, repo, tag
            );
            if let Some(html_url) = self.fetch_release_html_url(&api_url).await {
                return Some(html_url);
            }
        }
        None
    }

    async fn fetch_release_html_url(&self, api_url: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let mut request = self
            .client
            .get(api_url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.github_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().await.ok()?;
        body.get("html_url")?.as_str().map(str::to_string)
    }

    /// The dependency's GitHub project URL, from its registry metadata.
    async fn project_url(&self, name: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let registry_url = format!("{}/{}", self.npm_registry_base, name);
        let response = self.client.get(&registry_url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().await.ok()?;
        let repository_url = body.get("repository")?.get("url")?.as_str()?;
        normalize_github_url(repository_url)
    }

    async fn url_healthy(&self, url: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a manifest `repository.url` value to an `https` GitHub
/// project URL.
fn normalize_github_url(repository_url: &str) -> Option<String> {
    let mut url = repository_url.trim().to_string();
    if let Some(stripped) = url.strip_prefix("git+") {
        url = stripped.to_string();
    }
    if let Some(stripped) = url.strip_suffix(".git") {
        url = stripped.to_string();
    }
    if let Some(rest) = url.strip_prefix("git@github.com:") {
        url = format!("https://github.com/{rest}");
    } else if let Some(rest) = url.strip_prefix("ssh://git@github.com/") {
        url = format!("https://github.com/{rest}");
    } else if let Some(rest) = url.strip_prefix("git://github.com/") {
        url = format!("https://github.com/{rest}");
    }
    url.starts_with("https://github.com/").then_some(url)
}
