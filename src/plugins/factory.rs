//! plugins::factory
//!
//! Plugin construction, from an explicit repository kind (product
//! configuration) or by inspecting the working directory (standalone
//! repository releases).

use std::path::Path;

use super::{CdnHostingPlugin, DotnetPlugin, NodeServicePlugin, NpmPlugin, PluginError, RepositoryPlugin};
use crate::core::config::RepositoryKind;
use crate::core::manifest::MANIFEST_FILE_NAME;

/// Build the plugin for `cwd`.
///
/// With an explicit `kind` the choice is direct; otherwise the directory
/// contents decide: a `package.json` makes it an npm repository, a
/// `.csproj` (at the root or one level down) makes it a .NET one.
pub fn create_plugin(
    cwd: &Path,
    kind: Option<RepositoryKind>,
    project_file: Option<&str>,
) -> Result<Box<dyn RepositoryPlugin>, PluginError> {
    let kind = match kind {
        Some(kind) => kind,
        None => detect_kind(cwd)?,
    };

    Ok(match kind {
        RepositoryKind::Npm => Box::new(NpmPlugin::new(cwd)),
        RepositoryKind::NodeService => Box::new(NodeServicePlugin::new(cwd)),
        RepositoryKind::CdnHosting => Box::new(CdnHostingPlugin::new(cwd)),
        RepositoryKind::Dotnet => {
            let project_file = match project_file {
                Some(path) => cwd.join(path),
                None => DotnetPlugin::discover_project_file(cwd).ok_or_else(|| {
                    PluginError::UnknownRepositoryType {
                        cwd: cwd.to_path_buf(),
                    }
                })?,
            };
            // DotnetPlugin joins relative paths onto cwd; strip the
            // prefix when discovery returned an absolute path.
            let relative = project_file
                .strip_prefix(cwd)
                .map(Path::to_path_buf)
                .unwrap_or(project_file);
            Box::new(DotnetPlugin::new(cwd, relative))
        }
    })
}

fn detect_kind(cwd: &Path) -> Result<RepositoryKind, PluginError> {
    if cwd.join(MANIFEST_FILE_NAME).is_file() {
        return Ok(RepositoryKind::Npm);
    }
    if DotnetPlugin::discover_project_file(cwd).is_some() {
        return Ok(RepositoryKind::Dotnet);
    }
    Err(PluginError::UnknownRepositoryType {
        cwd: cwd.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_npm_from_a_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{}").unwrap();

        let plugin = create_plugin(dir.path(), None, None).unwrap();
        assert_eq!(plugin.display_type(), "npm");
    }

    #[test]
    fn detects_dotnet_from_a_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Example.csproj"), "<Project/>").unwrap();

        let plugin = create_plugin(dir.path(), None, None).unwrap();
        assert_eq!(plugin.display_type(), "dotnet");
    }

    #[test]
    fn unknown_contents_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            create_plugin(dir.path(), None, None),
            Err(PluginError::UnknownRepositoryType { .. })
        ));
    }

    #[test]
    fn explicit_kind_overrides_detection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{}").unwrap();

        let plugin = create_plugin(dir.path(), Some(RepositoryKind::NodeService), None).unwrap();
        assert_eq!(plugin.display_type(), "node-service");
    }
}
