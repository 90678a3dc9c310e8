//! release::workspace
//!
//! Scratch workspaces for product releases.
//!
//! Every repository of a product release is cloned into its own
//! temporary directory so the release never touches a developer's
//! working copy. Cleanup is tied to drop, so the scratch directory is
//! removed on success, on decline, and on error alike.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A scratch directory holding one cloned repository.
#[derive(Debug)]
pub struct Workspace {
    root: TempDir,
    repository_dir: PathBuf,
}

impl Workspace {
    /// Create a scratch workspace for `repository_name`.
    ///
    /// The directory name carries the repository name so leftover
    /// directories from a crashed run are attributable.
    pub fn create(repository_name: &str) -> std::io::Result<Self> {
        let root = tempfile::Builder::new()
            .prefix(&format!("shipwright-{repository_name}-"))
            .tempdir()?;
        let repository_dir = root.path().join(repository_name);
        Ok(Self {
            root,
            repository_dir,
        })
    }

    /// The workspace root; removed when the workspace drops.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Where the repository should be cloned to.
    pub fn repository_dir(&self) -> &Path {
        &self.repository_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_happens_on_drop() {
        let workspace = Workspace::create("example").unwrap();
        let root = workspace.path().to_path_buf();
        std::fs::create_dir_all(workspace.repository_dir()).unwrap();
        assert!(root.exists());
        drop(workspace);
        assert!(!root.exists());
    }

    #[test]
    fn directory_name_carries_the_repository_name() {
        let workspace = Workspace::create("apps-react").unwrap();
        let name = workspace
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(name.starts_with("shipwright-apps-react-"));
    }
}
