//! cli
//!
//! Command-line entry point: argument parsing, runtime construction,
//! and dispatch to the command handlers.

pub mod args;
pub mod commands;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use crate::ui::output::Verbosity;
use args::{Cli, Command};

/// Shared state every command receives.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory the command operates on
    pub cwd: PathBuf,
    /// Output verbosity from `--quiet`/`--debug`
    pub verbosity: Verbosity,
    /// Whether prompting is allowed
    pub interactive: bool,
}

/// Parse arguments and run the selected command to completion.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("could not determine the current directory")?,
    };
    let context = Context {
        cwd,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: cli.interactive(),
    };

    let runtime = tokio::runtime::Runtime::new().context("could not start the async runtime")?;
    runtime.block_on(async {
        match cli.command {
            Command::Repository {
                next_version,
                increment,
                no_git,
                name,
                no_name,
            } => {
                commands::repository::run(
                    &context,
                    commands::repository::Args {
                        next_version,
                        increment,
                        no_git,
                        name,
                        no_name,
                    },
                )
                .await
            }
            Command::Product { config } => {
                commands::product::run(&context, config.as_deref()).await
            }
            Command::ChangelogPreview => commands::preview::run(&context).await,
            Command::UpdateDependents { config } => {
                commands::update_dependents::run(&context, config.as_deref()).await
            }
        }
    })
}
