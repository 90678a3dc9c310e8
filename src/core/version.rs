//! core::version
//!
//! Version resolution: semver parsing, pre-release detection, and the
//! auto-increment policy.
//!
//! # Pre-release detection
//!
//! A version is treated as a pre-release only when its pre-release
//! component starts with a non-numeric tag followed by a numeric
//! sequence (`1.2.3-beta.3` → tag `beta`, sequence `3`). A component
//! with only one of the two parts (`1.2.3-beta`, `1.2.3-1`) is *not* a
//! pre-release for release purposes; pre-release handling (skipping the
//! changelog, suppressing the release name) only kicks in when both
//! parts are present.

use semver::Version;
use thiserror::Error;

/// Errors from version resolution.
///
/// All of these are fatal and occur before any repository mutation.
#[derive(Debug, Error)]
pub enum VersionError {
    /// The candidate does not parse as semver.
    #[error("next version is not valid semver: \"{input}\"")]
    Invalid {
        /// The rejected input
        input: String,
    },

    /// The candidate equals the repository's current version.
    #[error("next version must be different to the current version ({current})")]
    SameAsCurrent {
        /// The current version
        current: String,
    },

    /// A pre-release candidate was supplied where one is not allowed.
    #[error("next version must not be a pre-release version")]
    PreReleaseNotAllowed,

    /// The repository's current version could not be determined.
    #[error("could not determine current version for {display_type} repository: {cwd}")]
    NoCurrentVersion {
        /// The repository kind, for the error message
        display_type: String,
        /// The repository working directory
        cwd: String,
    },
}

/// A detected pre-release tag + sequence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// The non-numeric tag, e.g. `beta`
    pub tag: String,
    /// The numeric sequence following the tag, e.g. `3`
    pub sequence: u64,
}

/// Parse `input` as a semantic version.
pub fn parse(input: &str) -> Result<Version, VersionError> {
    Version::parse(input.trim()).map_err(|_| VersionError::Invalid {
        input: input.to_string(),
    })
}

/// Detect a pre-release tag + sequence pair in `version`.
///
/// Returns `None` for versions with no pre-release component, and for
/// pre-release components that do not carry both a leading non-numeric
/// identifier and a following numeric identifier.
pub fn pre_release(version: &Version) -> Option<PreRelease> {
    if version.pre.is_empty() {
        return None;
    }
    let mut identifiers = version.pre.as_str().split('.');
    let tag = identifiers.next()?;
    if tag.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let sequence: u64 = identifiers.next()?.parse().ok()?;
    Some(PreRelease {
        tag: tag.to_string(),
        sequence,
    })
}

/// Validate a candidate next version against the current version.
///
/// The candidate must parse as semver, must differ from `current`, and
/// when `no_pre_release` is set must not be detected as a pre-release.
pub fn validate_next(
    candidate: &str,
    current: &str,
    no_pre_release: bool,
) -> Result<Version, VersionError> {
    if candidate.trim() == current {
        return Err(VersionError::SameAsCurrent {
            current: current.to_string(),
        });
    }
    let version = parse(candidate)?;
    if no_pre_release && pre_release(&version).is_some() {
        return Err(VersionError::PreReleaseNotAllowed);
    }
    Ok(version)
}

/// A version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Increment {
    Major,
    Minor,
    Patch,
}

/// Increment `current` by the given component.
///
/// Lower components reset to zero and any pre-release or build metadata
/// is dropped, matching conventional semver increment semantics.
pub fn increment(current: &Version, increment: Increment) -> Version {
    match increment {
        Increment::Major => Version::new(current.major + 1, 0, 0),
        Increment::Minor => Version::new(current.major, current.minor + 1, 0),
        Increment::Patch => Version::new(current.major, current.minor, current.patch + 1),
    }
}
