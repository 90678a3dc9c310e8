//! changelog::document
//!
//! Changelog document model.
//!
//! # Grammar
//!
//! One canonical heading grammar is assumed:
//!
//! ```markdown
//! # Title
//!
//! Optional free-text description.
//!
//! ## Unreleased
//!
//! ## [1.2.3] - 2024-05-01
//!
//! Section body…
//! ```
//!
//! The document is read fresh from disk at the start of each release and
//! discarded after the rewritten text is persisted; nothing is cached
//! across releases. Section 0 is the only section eligible for mutation
//! and must case-insensitively contain "unreleased".

use std::path::{Path, PathBuf};

use semver::Version;
use thiserror::Error;

/// The changelog file name, relative to the repository root.
pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Index of the sole mutable section.
pub const UNRELEASED_SECTION_INDEX: usize = 0;

/// Errors from changelog parsing and loading.
///
/// All of these are fatal and abort the release before any write.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("failed to read changelog '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write changelog '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse changelog: {message}")]
    ParseError { message: String },

    #[error("\"Unreleased\" heading in CHANGELOG.md does not exist")]
    MissingUnreleased,
}

/// One `## `-level section of the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSection {
    /// Heading text after `## `, e.g. `[1.2.3] - 2024-05-01` or `Unreleased`
    pub title: String,
    /// The version extracted from the title, when one is present
    pub version: Option<Version>,
    /// Raw body up to the next section heading, trimmed
    pub body: String,
}

impl VersionSection {
    /// Whether this section is the mutable "Unreleased" slot.
    pub fn is_unreleased(&self) -> bool {
        self.title.to_lowercase().contains("unreleased")
    }
}

/// A parsed changelog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// Text after the leading `# `
    pub title: String,
    /// Free text between the title and the first section, if any
    pub description: Option<String>,
    /// Sections in document order
    pub sections: Vec<VersionSection>,
}

impl Changelog {
    /// Load and parse `dir/CHANGELOG.md`.
    ///
    /// Returns the parsed document together with the path it was read
    /// from, which is also where the rewritten document is persisted.
    pub fn load(dir: &Path) -> Result<(Self, PathBuf), ChangelogError> {
        let path = dir.join(CHANGELOG_FILE_NAME);
        let text = std::fs::read_to_string(&path).map_err(|source| ChangelogError::ReadError {
            path: path.clone(),
            source,
        })?;
        Ok((Self::parse(&text)?, path))
    }

    /// Parse a changelog from raw markdown.
    ///
    /// Line endings are normalized to `\n` so the rewritten file stays
    /// diff-stable across platforms.
    pub fn parse(text: &str) -> Result<Self, ChangelogError> {
        let text = text.replace("\r\n", "\n");

        let mut title = None;
        let mut description_lines: Vec<&str> = Vec::new();
        let mut sections: Vec<VersionSection> = Vec::new();
        let mut current: Option<(String, Vec<&str>)> = None;

        for line in text.lines() {
            if let Some(heading) = line.strip_prefix("## ") {
                if let Some((section_title, body)) = current.take() {
                    sections.push(Self::finish_section(section_title, &body));
                }
                current = Some((heading.trim().to_string(), Vec::new()));
            } else if let Some(heading) = line.strip_prefix("# ") {
                if title.is_some() || current.is_some() {
                    return Err(ChangelogError::ParseError {
                        message: format!("unexpected document title: \"{line}\""),
                    });
                }
                title = Some(heading.trim().to_string());
            } else {
                match current.as_mut() {
                    Some((_, body)) => body.push(line),
                    None => description_lines.push(line),
                }
            }
        }
        if let Some((section_title, body)) = current.take() {
            sections.push(Self::finish_section(section_title, &body));
        }

        let title = title.ok_or_else(|| ChangelogError::ParseError {
            message: "missing document title (\"# …\")".to_string(),
        })?;

        let description = {
            let text = description_lines.join("\n").trim().to_string();
            (!text.is_empty()).then_some(text)
        };

        Ok(Self {
            title,
            description,
            sections,
        })
    }

    fn finish_section(title: String, body: &[&str]) -> VersionSection {
        let version = extract_version(&title);
        VersionSection {
            title,
            version,
            body: body.join("\n").trim().to_string(),
        }
    }

    /// The mutable "Unreleased" section.
    ///
    /// Fails fast when section 0 is absent or is not the Unreleased
    /// slot: nothing else in the document may be mutated.
    pub fn unreleased(&self) -> Result<&VersionSection, ChangelogError> {
        self.sections
            .get(UNRELEASED_SECTION_INDEX)
            .filter(|section| section.is_unreleased())
            .ok_or(ChangelogError::MissingUnreleased)
    }

    /// The most recent released section, used to locate the previous
    /// release's tag.
    pub fn previous_release(&self) -> Option<&VersionSection> {
        self.sections.get(UNRELEASED_SECTION_INDEX + 1)
    }

    /// Re-render the document as markdown.
    ///
    /// The output is intentionally loose about blank lines; callers pass
    /// it through [`crate::changelog::format::format_markdown`] before
    /// persisting.
    pub fn render(&self) -> String {
        let mut out = format!("# {}\n\n", self.title);
        if let Some(description) = &self.description {
            out.push_str(description);
            out.push_str("\n\n");
        }
        for section in &self.sections {
            out.push_str(&format!("## {}\n\n", section.title));
            if !section.body.is_empty() {
                out.push_str(&section.body);
                out.push_str("\n\n");
            }
        }
        out
    }
}

/// Extract a semantic version from a section title such as
/// `[1.2.3] - 2024-05-01`.
fn extract_version(title: &str) -> Option<Version> {
    title
        .split_whitespace()
        .map(|token| token.trim_matches(|c| matches!(c, '[' | ']' | '(' | ')' | ',')))
        .find_map(|token| Version::parse(token).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "# Changelog\n\nAll notable changes.\n\n\
## Unreleased\n\n- pending thing\n\n\
## [1.1.0] - 2024-03-01\n\n### Added\n\n- feature\n\n\
## [1.0.0] - 2024-01-01\n\nInitial release.\n";

    #[test]
    fn parses_title_description_and_sections() {
        let changelog = Changelog::parse(EXAMPLE).unwrap();
        assert_eq!(changelog.title, "Changelog");
        assert_eq!(changelog.description.as_deref(), Some("All notable changes."));
        assert_eq!(changelog.sections.len(), 3);

        let unreleased = changelog.unreleased().unwrap();
        assert_eq!(unreleased.title, "Unreleased");
        assert_eq!(unreleased.body, "- pending thing");

        let previous = changelog.previous_release().unwrap();
        assert_eq!(previous.version, Some(Version::new(1, 1, 0)));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let changelog = Changelog::parse(&EXAMPLE.replace('\n', "\r\n")).unwrap();
        assert_eq!(changelog.unreleased().unwrap().body, "- pending thing");
    }

    #[test]
    fn missing_unreleased_fails_fast() {
        let text = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\nInitial.\n";
        let changelog = Changelog::parse(text).unwrap();
        assert!(matches!(
            changelog.unreleased(),
            Err(ChangelogError::MissingUnreleased)
        ));
    }

    #[test]
    fn unreleased_detection_is_case_insensitive() {
        let text = "# Changelog\n\n## UNRELEASED\n\n- x\n";
        let changelog = Changelog::parse(text).unwrap();
        assert!(changelog.unreleased().is_ok());
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        assert!(matches!(
            Changelog::parse("## Unreleased\n"),
            Err(ChangelogError::ParseError { .. })
        ));
    }

    #[test]
    fn render_round_trips_through_parse() {
        let changelog = Changelog::parse(EXAMPLE).unwrap();
        let rendered = changelog.render();
        let reparsed = Changelog::parse(&rendered).unwrap();
        assert_eq!(changelog, reparsed);
    }

    #[test]
    fn version_extraction_handles_decorated_titles() {
        assert_eq!(
            extract_version("[1.2.3] - 2024-05-01"),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(extract_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(extract_version("Unreleased"), None);
    }
}
