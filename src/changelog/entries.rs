//! changelog::entries
//!
//! Entry aggregation: loose change-entry fragments (files under the
//! `changelog-entries/` directory) plus any text already sitting under
//! the "Unreleased" heading are folded into one normalized,
//! type-grouped block ready for insertion into the changelog.
//!
//! # Contract
//!
//! Aggregation itself has no side effects. Fragment files are deleted by
//! the caller only after the changelog write that consumed them has
//! succeeded, one file at a time; a failure deleting one file is a
//! warning and does not stop deletion of the others.
//!
//! Aggregation is a straight fold: merging the same fragment twice
//! duplicates its entries under the relevant types, never the types
//! themselves.

use std::path::{Path, PathBuf};

use super::document::ChangelogError;
use super::format::format_markdown;
use crate::ui::progress::with_progress_sync;

/// Directory scanned (non-recursively) for entry fragments.
pub const CHANGELOG_ENTRIES_DIRECTORY_NAME: &str = "changelog-entries";

/// The conventional changelog change-type taxonomy, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeType {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl ChangeType {
    /// All change types in taxonomy order.
    pub const ALL: [ChangeType; 6] = [
        ChangeType::Added,
        ChangeType::Changed,
        ChangeType::Deprecated,
        ChangeType::Removed,
        ChangeType::Fixed,
        ChangeType::Security,
    ];

    /// The heading text for this change type.
    pub fn heading(self) -> &'static str {
        match self {
            ChangeType::Added => "Added",
            ChangeType::Changed => "Changed",
            ChangeType::Deprecated => "Deprecated",
            ChangeType::Removed => "Removed",
            ChangeType::Fixed => "Fixed",
            ChangeType::Security => "Security",
        }
    }

    fn parse(heading: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|change_type| heading.eq_ignore_ascii_case(change_type.heading()))
    }
}

/// An in-memory accumulation of changes keyed by change type.
///
/// Within a type, changes keep the order of first encounter across
/// fragments; type order follows the taxonomy, not arrival order.
#[derive(Debug, Clone, Default)]
pub struct AggregatedRelease {
    changes: Vec<(ChangeType, Vec<String>)>,
}

impl AggregatedRelease {
    /// Fold `text`, a miniature one-release changelog body, into the
    /// aggregate.
    ///
    /// Recognized structure: `### <ChangeType>` headings followed by
    /// `-`/`*` list items; indented lines continue the previous change;
    /// a literal `## Unreleased` self-heading is ignored. Text outside
    /// any recognized type heading is skipped.
    pub fn append(&mut self, text: &str) {
        let mut current_type: Option<ChangeType> = None;

        for line in text.replace("\r\n", "\n").lines() {
            let trimmed = line.trim();
            if let Some(heading) = trimmed.strip_prefix("### ") {
                current_type = ChangeType::parse(heading.trim());
                continue;
            }
            if trimmed.starts_with("## ") || trimmed.is_empty() {
                continue;
            }
            let Some(change_type) = current_type else {
                continue;
            };
            if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                self.push_change(change_type, item.trim().to_string());
            } else if line.starts_with(char::is_whitespace) {
                // Continuation of the previous list item.
                if let Some(last) = self.changes_mut(change_type).and_then(|c| c.last_mut()) {
                    last.push(' ');
                    last.push_str(trimmed);
                }
            }
        }
    }

    fn changes_mut(&mut self, change_type: ChangeType) -> Option<&mut Vec<String>> {
        self.changes
            .iter_mut()
            .find(|(existing, _)| *existing == change_type)
            .map(|(_, changes)| changes)
    }

    fn push_change(&mut self, change_type: ChangeType, change: String) {
        match self.changes_mut(change_type) {
            Some(changes) => changes.push(change),
            None => self.changes.push((change_type, vec![change])),
        }
    }

    /// Whether the aggregate holds no changes at all.
    pub fn is_empty(&self) -> bool {
        self.changes.iter().all(|(_, changes)| changes.is_empty())
    }

    /// Render the type-grouped markdown block in taxonomy order.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for change_type in ChangeType::ALL {
            let Some((_, changes)) = self
                .changes
                .iter()
                .find(|(existing, _)| *existing == change_type)
            else {
                continue;
            };
            if changes.is_empty() {
                continue;
            }
            out.push_str(&format!("### {}\n\n", change_type.heading()));
            for change in changes {
                out.push_str(&format!("- {change}\n"));
            }
            out.push('\n');
        }
        format_markdown(&out)
    }
}

/// One consumed entry fragment file.
#[derive(Debug, Clone)]
pub struct EntryFile {
    /// Absolute path of the fragment
    pub path: PathBuf,
    /// Raw fragment contents
    pub markdown: String,
}

/// The result of scanning and folding entry fragments.
#[derive(Debug, Clone)]
pub struct CollectedEntries {
    /// Formatted, type-grouped markdown block (empty when nothing found)
    pub formatted: String,
    /// Fragment files consumed by the fold, for deletion after a
    /// successful changelog write
    pub entry_files: Vec<EntryFile>,
}

/// Scan `cwd`'s entries directory and fold every fragment (plus any
/// `existing_entries` already in the changelog) into one block.
///
/// Fragments are read in lexicographic file-name order so the output is
/// deterministic regardless of filesystem enumeration order.
pub fn collect_entries(
    cwd: &Path,
    existing_entries: Option<&str>,
) -> Result<CollectedEntries, ChangelogError> {
    with_progress_sync(
        &format!(
            "Generating changelog entries from the \"{CHANGELOG_ENTRIES_DIRECTORY_NAME}\" directory"
        ),
        &format!(
            "Failed to generate changelog entries from the \"{CHANGELOG_ENTRIES_DIRECTORY_NAME}\" directory"
        ),
        |progress| {
            let mut aggregate = AggregatedRelease::default();
            if let Some(existing) = existing_entries {
                aggregate.append(existing);
            }

            let entry_files = read_entry_files(cwd)?;
            for entry_file in &entry_files {
                aggregate.append(&entry_file.markdown);
            }

            if entry_files.is_empty() {
                progress.info(format!(
                    "Skipping changelog entries from the \
                     \"{CHANGELOG_ENTRIES_DIRECTORY_NAME}\" directory as it contains no files"
                ));
            } else {
                progress.succeed(format!(
                    "Changelog entries from the \"{CHANGELOG_ENTRIES_DIRECTORY_NAME}\" \
                     directory will be added to CHANGELOG.md"
                ));
            }

            Ok(CollectedEntries {
                formatted: aggregate.to_markdown(),
                entry_files,
            })
        },
    )
}

fn read_entry_files(cwd: &Path) -> Result<Vec<EntryFile>, ChangelogError> {
    let dir = cwd.join(CHANGELOG_ENTRIES_DIRECTORY_NAME);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let read_error = |source: std::io::Error| ChangelogError::ReadError {
        path: dir.clone(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let markdown =
                std::fs::read_to_string(&path).map_err(|source| ChangelogError::ReadError {
                    path: path.clone(),
                    source,
                })?;
            Ok(EntryFile { path, markdown })
        })
        .collect()
}

/// Delete consumed fragment files after a successful changelog write.
///
/// Deletion is fire-and-forget per file: a failure is surfaced as a
/// warning and the remaining files are still attempted.
pub fn delete_entry_files(entry_files: &[EntryFile]) {
    for entry_file in entry_files {
        let path = entry_file.path.display().to_string();
        let _ = with_progress_sync::<_, std::io::Error, _>(
            &format!("Deleting file: \"{path}\""),
            &format!("Failed to delete file: \"{path}\""),
            |progress| {
                std::fs::remove_file(&entry_file.path)?;
                progress.succeed(format!("Deleted file: \"{path}\""));
                Ok(())
            },
        );
    }
}
