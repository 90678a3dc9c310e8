//! core::config
//!
//! Product configuration: the fixed list of repositories a product
//! release iterates, plus the GitHub owner used to build clone and pull
//! request URLs.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `--config <path>` if passed
//! 2. `$SHIPWRIGHT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/shipwright/product.toml`
//! 4. `./shipwright.toml`
//!
//! # Example
//!
//! ```toml
//! owner = "example-org"
//!
//! [[repositories]]
//! label = "@example/apps-react (npm package)"
//! name = "apps-react"
//! kind = "npm"
//! public = true
//!
//! [[repositories]]
//! label = "API"
//! name = "product-api"
//! kind = "node-service"
//!
//! [[repositories]]
//! label = ".NET SDK"
//! name = "dotnet-sdk"
//! kind = "dotnet"
//! project_file = "Example.SDK/Example.SDK.csproj"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error(
        "no product configuration found; pass --config or create \
         $XDG_CONFIG_HOME/shipwright/product.toml"
    )]
    NotFound,

    #[error("invalid config: {0}")]
    InvalidValue(String),
}

/// The repository kinds a product can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
    /// Published npm package
    Npm,
    /// Node.js service that is deployed, not published
    NodeService,
    /// Static assets served from a CDN
    CdnHosting,
    /// .NET package with a project-file version marker
    Dotnet,
}

/// One repository of the product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRepository {
    /// Human-readable label shown during the product release
    pub label: String,
    /// Repository name under the configured owner
    pub name: String,
    /// Repository kind, selects the version-marker plugin
    pub kind: RepositoryKind,
    /// Public repositories do not receive the internal release name
    #[serde(default)]
    pub public: bool,
    /// Project file holding the version marker (dotnet only)
    #[serde(default)]
    pub project_file: Option<PathBuf>,
}

/// Product configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    /// GitHub owner (user or organization) hosting every repository
    pub owner: String,
    /// The fixed, ordered list of repositories to release
    #[serde(default)]
    pub repositories: Vec<ProductRepository>,
}

impl ProductConfig {
    /// Load configuration, trying `explicit` first and then the
    /// standard locations.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::find_default()?,
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ProductConfig =
            toml::from_str(&text).map_err(|error| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn find_default() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("SHIPWRIGHT_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        if let Some(config_dir) = dirs::config_dir() {
            let candidate = config_dir.join("shipwright").join("product.toml");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        let local = PathBuf::from("shipwright.toml");
        if local.is_file() {
            return Ok(local);
        }
        Err(ConfigError::NotFound)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_empty() {
            return Err(ConfigError::InvalidValue("owner must not be empty".into()));
        }
        for repository in &self.repositories {
            if repository.kind == RepositoryKind::Dotnet && repository.project_file.is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "repository \"{}\" is dotnet but has no project_file",
                    repository.name
                )));
            }
        }
        Ok(())
    }

    /// SSH clone URL for one of the product's repositories.
    pub fn clone_url(&self, repository: &ProductRepository) -> String {
        format!("git@github.com:{}/{}.git", self.owner, repository.name)
    }

    /// GitHub Actions URL, reported for deployment-required repositories.
    pub fn actions_url(&self, repository: &ProductRepository) -> String {
        format!(
            "https://github.com/{}/{}/actions",
            self.owner, repository.name
        )
    }

    /// URL for opening a pull request from `branch`.
    pub fn new_pull_request_url(&self, repository: &ProductRepository, branch: &str) -> String {
        format!(
            "https://github.com/{}/{}/pull/new/{}",
            self.owner, repository.name, branch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
owner = "example-org"

[[repositories]]
label = "@example/apps-react (npm package)"
name = "apps-react"
kind = "npm"
public = true

[[repositories]]
label = "API"
name = "product-api"
kind = "node-service"

[[repositories]]
label = ".NET SDK"
name = "dotnet-sdk"
kind = "dotnet"
project_file = "Example.SDK/Example.SDK.csproj"
"#;

    #[test]
    fn parses_example_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product.toml");
        std::fs::write(&path, EXAMPLE).unwrap();

        let config = ProductConfig::load_from(&path).unwrap();
        assert_eq!(config.owner, "example-org");
        assert_eq!(config.repositories.len(), 3);
        assert_eq!(config.repositories[0].kind, RepositoryKind::Npm);
        assert!(config.repositories[0].public);
        assert_eq!(config.repositories[1].kind, RepositoryKind::NodeService);
        assert!(!config.repositories[1].public);

        assert_eq!(
            config.clone_url(&config.repositories[0]),
            "git@github.com:example-org/apps-react.git"
        );
        assert_eq!(
            config.actions_url(&config.repositories[1]),
            "https://github.com/example-org/product-api/actions"
        );
        assert_eq!(
            config.new_pull_request_url(&config.repositories[0], "AB-1"),
            "https://github.com/example-org/apps-react/pull/new/AB-1"
        );
    }

    #[test]
    fn dotnet_without_project_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product.toml");
        std::fs::write(
            &path,
            "owner = \"o\"\n\n[[repositories]]\nlabel = \"x\"\nname = \"x\"\nkind = \"dotnet\"\n",
        )
        .unwrap();
        assert!(matches!(
            ProductConfig::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
