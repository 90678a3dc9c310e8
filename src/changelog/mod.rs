//! changelog
//!
//! The changelog-entry aggregation and rewrite engine.
//!
//! # Pipeline
//!
//! - [`document`] parses `CHANGELOG.md` into an ordered sequence of
//!   version sections with the first section as the mutable
//!   "Unreleased" slot
//! - [`entries`] aggregates loose entry fragments into one type-grouped
//!   block
//! - [`dependencies`] decides whether a "Dependencies" block belongs in
//!   this release and produces it
//! - [`release`] assembles the pieces into the Unreleased section and
//!   persists the re-rendered document
//! - [`format`] is the canonical markdown formatter every rendered
//!   document and block passes through

pub mod dependencies;
pub mod document;
pub mod entries;
pub mod format;
pub mod release;

pub use document::{Changelog, ChangelogError, VersionSection};
pub use entries::{collect_entries, delete_entry_files, CollectedEntries, EntryFile};
pub use release::{add_next_release, next_release_entries, NextReleaseError, NextReleasePreview};
