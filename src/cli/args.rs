//! cli::args
//!
//! Command-line argument definitions.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::version::Increment;

/// Versioned releases for npm, Node service, CDN, and .NET repositories.
#[derive(Debug, Parser)]
#[command(name = "shipwright", version, about, propagate_version = true)]
pub struct Cli {
    /// Run as if started in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Print debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; fail where input would be required
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Whether prompting is allowed: an interactive terminal and no
    /// `--no-interactive` override.
    pub fn interactive(&self) -> bool {
        !self.no_interactive && std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Release the repository in the current directory
    Repository {
        /// The version to release (prompted when omitted)
        #[arg(long, value_name = "VERSION")]
        next_version: Option<String>,

        /// Derive the next version by incrementing the current one
        #[arg(long, value_enum, conflicts_with = "next_version")]
        increment: Option<Increment>,

        /// Update files only; skip commit, push, and tag
        #[arg(long)]
        no_git: bool,

        /// Release name recorded in the changelog and commit message
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Release without a release name
        #[arg(long, conflicts_with = "name")]
        no_name: bool,
    },

    /// Release every repository of the configured product, in order
    Product {
        /// Product configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show the pending changelog entries without releasing
    ChangelogPreview,

    /// Open dependency-bump branches in repositories that depend on this
    /// package
    UpdateDependents {
        /// Product configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repository_flags() {
        let cli = Cli::try_parse_from([
            "shipwright",
            "repository",
            "--next-version",
            "1.2.3",
            "--no-git",
            "--no-name",
        ])
        .unwrap();
        match cli.command {
            Command::Repository {
                next_version,
                increment,
                no_git,
                name,
                no_name,
            } => {
                assert_eq!(next_version.as_deref(), Some("1.2.3"));
                assert!(increment.is_none());
                assert!(no_git);
                assert!(name.is_none());
                assert!(no_name);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn next_version_and_increment_conflict() {
        assert!(Cli::try_parse_from([
            "shipwright",
            "repository",
            "--next-version",
            "1.2.3",
            "--increment",
            "minor",
        ])
        .is_err());
    }

    #[test]
    fn name_and_no_name_conflict() {
        assert!(Cli::try_parse_from([
            "shipwright",
            "repository",
            "--name",
            "Osprey",
            "--no-name",
        ])
        .is_err());
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli =
            Cli::try_parse_from(["shipwright", "changelog-preview", "--cwd", "/tmp", "--quiet"])
                .unwrap();
        assert_eq!(cli.cwd.as_deref(), Some(std::path::Path::new("/tmp")));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::ChangelogPreview));
    }
}
