//! changelog::dependencies
//!
//! Decides whether a "### Dependencies" block belongs in the release
//! being cut, and produces it.
//!
//! The comparison baseline is the manifest at the previous release's
//! tag (`v<version>`). Several conditions skip the block without
//! failing the release; only infrastructure errors (an unreadable
//! repository, a broken manifest) abort.

use crate::changelog::document::VersionSection;
use crate::plugins::{DependenciesChangelog, PluginError, RepositoryPlugin};
use crate::ui::progress::with_progress;

/// Heading of the generated block inside a release section.
pub const DEPENDENCIES_HEADING: &str = "### Dependencies";

/// Produce the "### Dependencies" block for the release being cut, or
/// an empty string when the block does not apply.
///
/// Skip conditions, in order:
/// - the repository kind does not support dependency changelogs
/// - the "Unreleased" section already carries the heading (it was
///   written by hand and must not be duplicated)
/// - there is no previous release to compare against
/// - the previous release heading has no parseable version
/// - the diff could not be computed (missing tag, missing manifest at
///   the tag): surfaced as a warning
/// - nothing changed between the two manifests
pub async fn dependencies_entry(
    unreleased_body: &str,
    previous_release: Option<&VersionSection>,
    plugin: &dyn RepositoryPlugin,
) -> Result<String, PluginError> {
    with_progress(
        "Generating dependency changelog entries",
        "Failed to generate dependency changelog entries",
        |progress| async move {
            if !plugin.supports_dependencies_changelog() {
                progress.info(format!(
                    "Skipping dependency changelog entries as \"{}\" repositories do not \
                     support them",
                    plugin.display_type()
                ));
                return Ok(String::new());
            }

            if unreleased_body.contains(DEPENDENCIES_HEADING) {
                progress.warn(format!(
                    "Skipping dependency changelog entries as the \"Unreleased\" section \
                     already contains a \"{DEPENDENCIES_HEADING}\" heading"
                ));
                return Ok(String::new());
            }

            let Some(previous) = previous_release else {
                progress.info(
                    "Skipping dependency changelog entries as there is no previous release \
                     to compare against",
                );
                return Ok(String::new());
            };
            let Some(previous_version) = &previous.version else {
                progress.warn(format!(
                    "Skipping dependency changelog entries as the previous release heading \
                     \"{}\" has no version",
                    previous.title
                ));
                return Ok(String::new());
            };

            let tag = format!("v{previous_version}");
            match plugin.dependencies_changelog(&tag).await? {
                DependenciesChangelog::Warning(message) => {
                    progress.warn(format!(
                        "Skipping dependency changelog entries: {message}"
                    ));
                    Ok(String::new())
                }
                DependenciesChangelog::Entries(None) => {
                    progress.info(format!(
                        "Skipping dependency changelog entries as no dependencies changed \
                         since \"{tag}\""
                    ));
                    Ok(String::new())
                }
                DependenciesChangelog::Entries(Some(entries)) => {
                    progress.succeed(
                        "Dependency changelog entries will be added to CHANGELOG.md",
                    );
                    Ok(format!("{DEPENDENCIES_HEADING}\n\n{entries}"))
                }
            }
        },
    )
    .await
}
