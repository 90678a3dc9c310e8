//! cli::commands::repository
//!
//! `shipwright repository`: release the repository in the current
//! directory.

use anyhow::Context as _;

use crate::cli::Context;
use crate::core::version::{self, Increment, VersionError};
use crate::plugins::create_plugin;
use crate::release::{release_repository, ReleaseOptions};
use crate::ui::output;
use crate::ui::prompts;

#[derive(Debug)]
pub struct Args {
    pub next_version: Option<String>,
    pub increment: Option<Increment>,
    pub no_git: bool,
    pub name: Option<String>,
    pub no_name: bool,
}

pub async fn run(context: &Context, args: Args) -> anyhow::Result<()> {
    let plugin = create_plugin(&context.cwd, None, None)?;
    output::debug(
        format!("detected a \"{}\" repository", plugin.display_type()),
        context.verbosity,
    );

    let current_version = plugin
        .current_version()
        .await?
        .ok_or_else(|| VersionError::NoCurrentVersion {
            display_type: plugin.display_type().to_string(),
            cwd: context.cwd.display().to_string(),
        })?;

    let next_version = match (args.next_version, args.increment) {
        (Some(next_version), _) => next_version,
        (None, Some(increment)) => {
            version::increment(&version::parse(&current_version)?, increment).to_string()
        }
        (None, None) => prompts::next_version(&current_version, false, context.interactive)?,
    };

    // Validate up front so the release-name prompt is not shown for a
    // version that would be rejected anyway.
    let validated = version::validate_next(&next_version, &current_version, false)?;

    let release_name = if args.no_name || version::pre_release(&validated).is_some() {
        None
    } else {
        match args.name {
            Some(name) => Some(name),
            None => Some(prompts::release_name(context.interactive)?),
        }
    };

    let released = release_repository(
        plugin.as_ref(),
        &ReleaseOptions {
            next_version,
            release_name,
            git: !args.no_git,
        },
    )
    .await
    .with_context(|| format!("failed to release \"{}\"", context.cwd.display()))?;

    output::print(
        output::success_text(format!("Released {released}")),
        context.verbosity,
    );
    Ok(())
}
