//! Shipwright - a CLI for coordinated repository and product releases
//!
//! Shipwright automates versioned releases across a collection of
//! independently-versioned repositories ("a product"). For a single
//! repository it resolves the next version, rewrites `CHANGELOG.md`, bumps
//! the repository's version marker, and commits/tags/pushes the result. For
//! a product it clones each configured repository into a scratch directory,
//! previews the pending changelog entries, prompts for a release decision,
//! and runs the same per-repository release.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to release)
//! - [`release`] - Orchestrates resolve → changelog → version marker → VCS
//! - [`changelog`] - Document model, entry aggregation, and rewriting
//! - [`diff`] - Dependency delta classification and link decoration
//! - [`core`] - Domain leaves: versions, manifests, product configuration
//! - [`plugins`] - Abstraction over how a repository stores its version
//! - [`git`] - Single interface for all Git operations
//! - [`process`] - External command invocation
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Shipwright maintains the following invariants:
//!
//! 1. An invalid next version fails the release before any mutation occurs
//! 2. Pre-release versions never mutate the changelog
//! 3. The version marker is only touched after the changelog write completes
//! 4. Scratch clone directories are removed on every exit path

pub mod changelog;
pub mod cli;
pub mod core;
pub mod diff;
pub mod git;
pub mod plugins;
pub mod process;
pub mod release;
pub mod ui;
