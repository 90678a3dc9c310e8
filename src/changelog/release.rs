//! changelog::release
//!
//! Assembles and persists the next release section.
//!
//! The entire rewrite (existing "Unreleased" content, folded entry
//! fragments, the optional dependencies block) is computed in memory
//! and persisted with a single write. Fragment files are deleted only
//! after that write has succeeded.

use std::path::PathBuf;

use chrono::Utc;
use semver::Version;
use thiserror::Error;

use super::dependencies::dependencies_entry;
use super::document::{Changelog, ChangelogError, VersionSection, UNRELEASED_SECTION_INDEX};
use super::entries::{collect_entries, delete_entry_files, EntryFile};
use super::format::format_markdown;
use crate::plugins::{PluginError, RepositoryPlugin};
use crate::ui::progress::with_progress_sync;

/// Errors from assembling the next release section.
#[derive(Debug, Error)]
pub enum NextReleaseError {
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// Everything that would land under the next release's heading, without
/// touching any file.
#[derive(Debug)]
pub struct NextReleasePreview {
    /// Formatted section body (empty when there is nothing to release)
    pub entries: String,
    /// Fragment files that would be consumed
    pub entry_files: Vec<EntryFile>,
    /// The changelog that would be rewritten
    pub changelog_path: PathBuf,
}

/// Compute the next release's section body without mutating anything.
///
/// Used to show what a release would contain before committing to it.
/// Existing "Unreleased" content is folded through the aggregator here so
/// the preview shows one merged, type-grouped view.
pub async fn next_release_entries(
    plugin: &dyn RepositoryPlugin,
) -> Result<NextReleasePreview, NextReleaseError> {
    let (changelog, changelog_path) = Changelog::load(plugin.cwd())?;
    let unreleased_body = changelog.unreleased()?.body.clone();

    let collected = collect_entries(plugin.cwd(), Some(&unreleased_body))?;
    let dependencies =
        dependencies_entry(&unreleased_body, changelog.previous_release(), plugin).await?;

    Ok(NextReleasePreview {
        entries: assemble_body(None, "", &collected.formatted, &dependencies),
        entry_files: collected.entry_files,
        changelog_path,
    })
}

/// Rewrite `CHANGELOG.md` with `next_version` as the newest release.
///
/// The "Unreleased" section is emptied, and a new dated section is
/// inserted directly below it: the optional release-name subtitle, the
/// original "Unreleased" body verbatim, the folded entry fragments, and
/// the dependencies block, in that order. Consumed fragment files are
/// deleted after the write succeeds.
pub async fn add_next_release(
    plugin: &dyn RepositoryPlugin,
    next_version: &Version,
    release_name: Option<&str>,
) -> Result<(), NextReleaseError> {
    let (mut changelog, changelog_path) = Changelog::load(plugin.cwd())?;
    let unreleased_body = changelog.unreleased()?.body.clone();

    let collected = collect_entries(plugin.cwd(), None)?;
    let dependencies =
        dependencies_entry(&unreleased_body, changelog.previous_release(), plugin).await?;

    let title = format!("[{next_version}] - {}", Utc::now().format("%Y-%m-%d"));
    let body = assemble_body(
        release_name,
        &unreleased_body,
        &collected.formatted,
        &dependencies,
    );

    changelog.sections[UNRELEASED_SECTION_INDEX] = VersionSection {
        title: "Unreleased".to_string(),
        version: None,
        body: String::new(),
    };
    changelog.sections.insert(
        UNRELEASED_SECTION_INDEX + 1,
        VersionSection {
            title,
            version: Some(next_version.clone()),
            body,
        },
    );

    let rendered = format_markdown(&changelog.render());
    with_progress_sync(
        "Updating CHANGELOG.md",
        "Failed to update CHANGELOG.md",
        |progress| {
            std::fs::write(&changelog_path, &rendered).map_err(|source| {
                ChangelogError::WriteError {
                    path: changelog_path.clone(),
                    source,
                }
            })?;
            progress.succeed(format!("Updated {}", changelog_path.display()));
            Ok::<_, ChangelogError>(())
        },
    )?;

    delete_entry_files(&collected.entry_files);
    Ok(())
}

/// Join the release-name subtitle, the previous "Unreleased" body, the
/// grouped entries, and the dependencies block into one normalized
/// section body.
fn assemble_body(
    release_name: Option<&str>,
    unreleased_body: &str,
    entries: &str,
    dependencies: &str,
) -> String {
    let mut body = String::new();
    if let Some(name) = release_name {
        body.push_str(&format!("##### Release Name: {name}\n\n"));
    }
    if !unreleased_body.is_empty() {
        body.push_str(unreleased_body);
        body.push('\n');
    }
    if !entries.is_empty() {
        body.push('\n');
        body.push_str(entries);
    }
    if !dependencies.is_empty() {
        body.push('\n');
        body.push_str(dependencies);
    }
    format_markdown(&body).trim().to_string()
}
