//! release::product
//!
//! The product release flow: walk the configured repositories in order,
//! clone each into a scratch workspace, show what a release would
//! contain, and release the ones the user confirms.
//!
//! Declining a repository moves on to the next; a hard failure stops the
//! remainder of the walk. Scratch workspaces are removed when each
//! iteration ends, whatever the outcome.

use anyhow::Context as _;

use super::workspace::Workspace;
use super::{release_repository, ReleaseOptions};
use crate::core::config::{ProductConfig, ProductRepository};
use crate::core::version;
use crate::git::{self, Git};
use crate::plugins::create_plugin;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts;

/// One repository released during a product walk.
#[derive(Debug)]
pub struct ReleasedRepository {
    /// The repository's configured label
    pub label: String,
    /// The version that was released
    pub version: semver::Version,
    /// Actions URL, present when the repository must now be deployed
    pub actions_url: Option<String>,
}

/// Release a product: every configured repository, in order, each behind
/// its own confirmation.
pub async fn release_product(
    config: &ProductConfig,
    interactive: bool,
    verbosity: Verbosity,
) -> anyhow::Result<Vec<ReleasedRepository>> {
    let release_name = prompts::release_name(interactive)?;

    let mut released = Vec::new();
    for repository in &config.repositories {
        output::print("", verbosity);
        output::print(
            output::info_text(format!("── {} ──", repository.label)),
            verbosity,
        );

        if let Some(outcome) =
            release_one(config, repository, &release_name, interactive, verbosity).await?
        {
            released.push(outcome);
        }
    }

    report(&released, verbosity);
    Ok(released)
}

/// Clone, preview, confirm, and release one repository.
///
/// Returns `None` when the user declines. The scratch workspace lives
/// for the duration of this call only.
async fn release_one(
    config: &ProductConfig,
    repository: &ProductRepository,
    release_name: &str,
    interactive: bool,
    verbosity: Verbosity,
) -> anyhow::Result<Option<ReleasedRepository>> {
    let workspace = Workspace::create(&repository.name)
        .with_context(|| format!("could not create a workspace for \"{}\"", repository.name))?;
    git::clone(&config.clone_url(repository), workspace.repository_dir())?;

    let cwd = workspace.repository_dir();
    let git = Git::open(cwd)?;
    output::print(
        output::subdued_text(format!("Last commit: {}", git.last_commit_line()?)),
        verbosity,
    );

    let project_file = repository
        .project_file
        .as_ref()
        .and_then(|path| path.to_str());
    let plugin = create_plugin(cwd, Some(repository.kind), project_file)?;

    let preview = crate::changelog::next_release_entries(plugin.as_ref()).await?;
    if preview.entries.is_empty() {
        output::print(
            output::subdued_text("There are no unreleased changelog entries."),
            verbosity,
        );
    } else {
        output::print(
            output::panel(Some("Unreleased"), &preview.entries),
            verbosity,
        );
    }

    if !prompts::confirm_repository_release(&repository.label, interactive)? {
        return Ok(None);
    }

    let current_version = plugin
        .current_version()
        .await?
        .ok_or_else(|| version::VersionError::NoCurrentVersion {
            display_type: plugin.display_type().to_string(),
            cwd: cwd.display().to_string(),
        })?;

    // Kinds with a fixed increment policy choose their own next version;
    // everything else is prompted, pre-releases excluded.
    let next_version = match plugin
        .auto_increment_version(&version::parse(&current_version)?)
        .await
    {
        Some(next) => next,
        None => prompts::next_version(&current_version, true, interactive)?,
    };

    let options = ReleaseOptions {
        next_version,
        // Public repositories must not leak the internal release name.
        release_name: (!repository.public).then(|| release_name.to_string()),
        git: true,
    };
    let version = release_repository(plugin.as_ref(), &options).await?;

    Ok(Some(ReleasedRepository {
        label: repository.label.clone(),
        version,
        actions_url: plugin
            .is_deployment_required()
            .then(|| config.actions_url(repository)),
    }))
}

/// Print the closing summary: what was released, and what must now be
/// deployed.
fn report(released: &[ReleasedRepository], verbosity: Verbosity) {
    output::print("", verbosity);
    if released.is_empty() {
        output::print(output::subdued_text("Nothing was released."), verbosity);
        return;
    }

    let lines: Vec<String> = released
        .iter()
        .map(|repository| format!("{} {}", repository.label, repository.version))
        .collect();
    output::print(
        output::panel(Some("Released"), &lines.join("\n")),
        verbosity,
    );

    let deployments: Vec<String> = released
        .iter()
        .filter_map(|repository| {
            repository
                .actions_url
                .as_ref()
                .map(|url| format!("{}: {url}", repository.label))
        })
        .collect();
    if !deployments.is_empty() {
        output::print("", verbosity);
        output::print(
            output::panel(Some("Deployments required"), &deployments.join("\n")),
            verbosity,
        );
    }
}
