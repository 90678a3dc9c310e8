//! git::interface
//!
//! Git interface implementation.
//!
//! This module provides the **single doorway** to all Git operations in
//! Shipwright. No other module should import `git2` or spawn `git`
//! directly.
//!
//! # Design
//!
//! Reads go through `git2`: resolving a release tag and reading the
//! manifest pinned at it, and summarizing the last commit. Mutations
//! (stage, commit, push, tag, clone) shell out to the `git` binary so
//! the user's transport and credential configuration apply unchanged;
//! a non-zero exit is a failure.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested revision does not exist
//! - [`GitError::FileNotFoundAtRevision`]: Revision exists but lacks the file
//! - [`GitError::CommandFailed`]: A `git` subprocess exited non-zero

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::process::{self, ProcessError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested revision does not exist.
    #[error("revision not found: {revision}")]
    RefNotFound {
        /// The revision that was not found
        revision: String,
    },

    /// The revision exists but does not contain the requested file.
    #[error("{revision} does not contain {path}")]
    FileNotFoundAtRevision {
        /// The revision that was inspected
        revision: String,
        /// The path missing from that revision
        path: String,
    },

    /// Blob content is not valid UTF-8.
    #[error("file at {revision}:{path} is not valid UTF-8")]
    InvalidUtf8 {
        /// The revision that was inspected
        revision: String,
        /// The offending path
        path: String,
    },

    /// A `git` subprocess failed.
    #[error(transparent)]
    CommandFailed(#[from] ProcessError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// The Git interface.
///
/// One instance per repository working directory, opened fresh for each
/// release attempt.
pub struct Git {
    repo: git2::Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("workdir", &self.workdir).finish()
    }
}

impl Git {
    /// Open the repository containing `path`.
    ///
    /// Uses `git2::Repository::discover`, so `path` may be any directory
    /// within the repository.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        let workdir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();
        Ok(Self { repo, workdir })
    }

    /// The repository working directory.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Read a file's contents as they were at `revision`.
    ///
    /// `revision` is typically a release tag such as `v1.2.3`. A missing
    /// revision and a missing file are reported as distinct errors so
    /// callers can degrade differently (an untagged previous release is
    /// a warning, not a failure).
    pub fn show_file_at(&self, revision: &str, path: &str) -> Result<String, GitError> {
        let object = self
            .repo
            .revparse_single(revision)
            .map_err(|_| GitError::RefNotFound {
                revision: revision.to_string(),
            })?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| GitError::RefNotFound {
                revision: revision.to_string(),
            })?;
        let tree = commit.tree()?;
        let entry =
            tree.get_path(Path::new(path))
                .map_err(|_| GitError::FileNotFoundAtRevision {
                    revision: revision.to_string(),
                    path: path.to_string(),
                })?;
        let blob = entry
            .to_object(&self.repo)?
            .peel_to_blob()
            .map_err(|_| GitError::FileNotFoundAtRevision {
                revision: revision.to_string(),
                path: path.to_string(),
            })?;
        String::from_utf8(blob.content().to_vec()).map_err(|_| GitError::InvalidUtf8 {
            revision: revision.to_string(),
            path: path.to_string(),
        })
    }

    /// One-line summary of the last commit (`<short oid> <summary>`).
    pub fn last_commit_line(&self) -> Result<String, GitError> {
        let head = self.repo.head()?.peel_to_commit()?;
        let short = head
            .as_object()
            .short_id()?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let summary = head.summary().unwrap_or_default().to_string();
        Ok(format!("{short} {summary}"))
    }

    // =========================================================================
    // Mutations (subprocess git)
    // =========================================================================

    /// Stage all changes in the working directory.
    pub fn stage_all(&self) -> Result<(), GitError> {
        process::run("git", &["add", "-A"], &self.workdir)?;
        Ok(())
    }

    /// Commit staged changes with `message`.
    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        process::run("git", &["commit", "--message", message], &self.workdir)?;
        Ok(())
    }

    /// Push the current branch to its upstream.
    pub fn push(&self) -> Result<(), GitError> {
        process::run("git", &["push"], &self.workdir)?;
        Ok(())
    }

    /// Push a branch to origin, setting its upstream.
    pub fn push_new_branch(&self, branch: &str) -> Result<(), GitError> {
        process::run("git", &["push", "-u", "origin", branch], &self.workdir)?;
        Ok(())
    }

    /// Create an annotated tag with `message`.
    pub fn tag_annotated(&self, tag: &str, message: &str) -> Result<(), GitError> {
        process::run("git", &["tag", "-a", tag, "-m", message], &self.workdir)?;
        Ok(())
    }

    /// Push tags to the remote.
    pub fn push_tags(&self) -> Result<(), GitError> {
        process::run("git", &["push", "--tags"], &self.workdir)?;
        Ok(())
    }

    /// Create and check out a new branch.
    pub fn checkout_new_branch(&self, branch: &str) -> Result<(), GitError> {
        process::run("git", &["checkout", "-b", branch], &self.workdir)?;
        Ok(())
    }
}

/// Clone `url` into `destination`.
pub fn clone(url: &str, destination: &Path) -> Result<(), GitError> {
    let destination = destination.to_string_lossy();
    process::run("git", &["clone", url, destination.as_ref()], Path::new("."))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn run_git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .expect("failed to run git");
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo(dir: &Path) {
        run_git(dir, &["init", "-b", "main"]);
        run_git(dir, &["config", "user.email", "test@example.com"]);
        run_git(dir, &["config", "user.name", "Test User"]);
    }

    #[test]
    fn open_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Git::open(dir.path()),
            Err(GitError::NotARepo { .. })
        ));
    }

    #[test]
    fn show_file_at_distinguishes_missing_tag_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("package.json"), "{\"version\":\"1.0.0\"}").unwrap();
        run_git(dir.path(), &["add", "-A"]);
        run_git(dir.path(), &["commit", "-m", "initial"]);
        run_git(dir.path(), &["tag", "-a", "v1.0.0", "-m", "v1.0.0"]);

        let git = Git::open(dir.path()).unwrap();

        let contents = git.show_file_at("v1.0.0", "package.json").unwrap();
        assert!(contents.contains("1.0.0"));

        assert!(matches!(
            git.show_file_at("v0.9.0", "package.json"),
            Err(GitError::RefNotFound { .. })
        ));
        assert!(matches!(
            git.show_file_at("v1.0.0", "missing.json"),
            Err(GitError::FileNotFoundAtRevision { .. })
        ));
    }

    #[test]
    fn last_commit_line_has_short_oid_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("README.md"), "# test\n").unwrap();
        run_git(dir.path(), &["add", "-A"]);
        run_git(dir.path(), &["commit", "-m", "initial commit"]);

        let git = Git::open(dir.path()).unwrap();
        let line = git.last_commit_line().unwrap();
        assert!(line.ends_with("initial commit"));
        assert!(line.split_whitespace().next().unwrap().len() >= 7);
    }

    #[test]
    fn stage_and_commit_through_the_interface() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        run_git(dir.path(), &["add", "-A"]);
        run_git(dir.path(), &["commit", "-m", "initial"]);

        let git = Git::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), "two\n").unwrap();
        git.stage_all().unwrap();
        git.commit("[RELEASE] 1.1.0").unwrap();
        assert_eq!(git.last_commit_line().unwrap().split_once(' ').unwrap().1, "[RELEASE] 1.1.0");

        git.tag_annotated("v1.1.0", "[RELEASE] 1.1.0").unwrap();
        assert!(git.show_file_at("v1.1.0", "a.txt").unwrap().contains("two"));
    }
}
