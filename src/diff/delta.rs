//! diff::delta
//!
//! Dependency delta classification.
//!
//! Two manifest snapshots (the manifest at the previous release tag and
//! the current one) are compared dependency by dependency. Effective
//! versions are extracted by stripping range qualifiers (`^1.2.3` →
//! `1.2.3`) and compared as semver:
//!
//! - present only in the new manifest → new dependency
//! - present only in the old manifest → removed
//! - strictly greater → upgrade; strictly lesser → downgrade
//! - equal effective versions produce no entry, so a range-qualifier-only
//!   change (`^1.0.0` → `~1.0.0`) is silent

use std::collections::BTreeSet;

use semver::Version;

use super::links::LinkResolver;
use crate::core::manifest::PackageManifest;

/// How a dependency's specifier changed between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaKind {
    /// Newly depended upon
    New {
        /// Effective new version
        version: Version,
    },
    /// No longer depended upon
    Removed,
    /// Effective version increased
    Upgraded {
        /// Effective old version
        from: Version,
        /// Effective new version
        to: Version,
    },
    /// Effective version decreased
    Downgraded {
        /// Effective old version
        from: Version,
        /// Effective new version
        to: Version,
    },
}

/// One dependency whose specifier differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDelta {
    /// Dependency name
    pub name: String,
    /// The classified change
    pub kind: DeltaKind,
}

/// Extract the effective semantic version from a range specifier.
///
/// Strips qualifiers like `^`, `~`, `>=` by scanning for the first
/// parseable `major.minor.patch[-pre]` substring. Specifiers with no
/// such substring (`latest`, git URLs) yield `None` and the dependency
/// is left unclassified.
pub fn extract_version(range: &str) -> Option<Version> {
    let bytes = range.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if !byte.is_ascii_digit() {
            continue;
        }
        // Must start a fresh identifier, not continue one.
        if index > 0 && (bytes[index - 1].is_ascii_alphanumeric() || bytes[index - 1] == b'.') {
            continue;
        }
        let candidate = &range[index..];
        let end = candidate
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-')))
            .unwrap_or(candidate.len());
        if let Ok(version) = Version::parse(candidate[..end].trim_end_matches('.')) {
            return Some(version);
        }
    }
    None
}

/// Compare two manifest snapshots, returning one delta per changed
/// dependency, sorted by name.
pub fn diff_manifests(old: &PackageManifest, new: &PackageManifest) -> Vec<DependencyDelta> {
    let names: BTreeSet<&String> = old
        .dependencies
        .keys()
        .chain(new.dependencies.keys())
        .collect();

    let mut deltas = Vec::new();
    for name in names {
        let old_range = old.dependencies.get(name);
        let new_range = new.dependencies.get(name);
        let kind = match (old_range, new_range) {
            (None, Some(new_range)) => match extract_version(new_range) {
                Some(version) => DeltaKind::New { version },
                None => continue,
            },
            (Some(_), None) => DeltaKind::Removed,
            (Some(old_range), Some(new_range)) => {
                if old_range == new_range {
                    continue;
                }
                let (Some(from), Some(to)) =
                    (extract_version(old_range), extract_version(new_range))
                else {
                    continue;
                };
                match to.cmp(&from) {
                    std::cmp::Ordering::Greater => DeltaKind::Upgraded { from, to },
                    std::cmp::Ordering::Less => DeltaKind::Downgraded { from, to },
                    // Range-qualifier-only change with the same resolved
                    // version stays silent.
                    std::cmp::Ordering::Equal => continue,
                }
            }
            (None, None) => continue,
        };
        deltas.push(DependencyDelta {
            name: name.clone(),
            kind,
        });
    }
    deltas
}

/// Render deltas as markdown list items, decorating names and versions
/// with links where the resolver can find them.
pub async fn render_deltas(deltas: &[DependencyDelta], links: &LinkResolver) -> String {
    let mut out = String::new();
    for delta in deltas {
        let name_md = links.name_markdown(&delta.name).await;
        let line = match &delta.kind {
            DeltaKind::Removed => format!("- no longer depend upon {name_md}"),
            DeltaKind::New { version } => {
                let version_md = links.version_markdown(&delta.name, version).await;
                format!("- depend upon {name_md} {version_md}")
            }
            DeltaKind::Upgraded { from, to } => {
                let to_md = links.version_markdown(&delta.name, to).await;
                let from_md = links.version_markdown(&delta.name, from).await;
                format!("- update {name_md} to {to_md} (from {from_md})")
            }
            DeltaKind::Downgraded { from, to } => {
                let to_md = links.version_markdown(&delta.name, to).await;
                let from_md = links.version_markdown(&delta.name, from).await;
                format!("- rollback {name_md} to {to_md} (from {from_md})")
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::parse(Path::new("package.json"), json).unwrap()
    }

    #[test]
    fn extracts_versions_from_ranges() {
        assert_eq!(extract_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(extract_version("^1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(extract_version("~1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(extract_version(">=1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(
            extract_version("^1.2.3-beta.1").unwrap().to_string(),
            "1.2.3-beta.1"
        );
        assert_eq!(extract_version("latest"), None);
        assert_eq!(extract_version("git+ssh://example.com/repo"), None);
    }

    #[test]
    fn classifies_new_and_upgraded_dependencies() {
        let old = manifest(r#"{ "dependencies": { "a": "1.0.0" } }"#);
        let new = manifest(r#"{ "dependencies": { "a": "2.0.0", "b": "1.0.0" } }"#);

        let deltas = diff_manifests(&old, &new);
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].name, "a");
        assert_eq!(
            deltas[0].kind,
            DeltaKind::Upgraded {
                from: Version::new(1, 0, 0),
                to: Version::new(2, 0, 0),
            }
        );
        assert_eq!(deltas[1].name, "b");
        assert_eq!(
            deltas[1].kind,
            DeltaKind::New {
                version: Version::new(1, 0, 0)
            }
        );
    }

    #[test]
    fn unchanged_dependencies_are_silent() {
        let old = manifest(r#"{ "dependencies": { "a": "1.0.0", "b": "^2.0.0" } }"#);
        let new = manifest(r#"{ "dependencies": { "a": "1.0.0", "b": "^2.0.0" } }"#);
        assert!(diff_manifests(&old, &new).is_empty());
    }

    #[test]
    fn qualifier_only_change_is_silent() {
        let old = manifest(r#"{ "dependencies": { "a": "^1.0.0" } }"#);
        let new = manifest(r#"{ "dependencies": { "a": "~1.0.0" } }"#);
        assert!(diff_manifests(&old, &new).is_empty());
    }

    #[test]
    fn classifies_removed_and_downgraded_dependencies() {
        let old = manifest(r#"{ "dependencies": { "a": "2.0.0", "b": "1.0.0" } }"#);
        let new = manifest(r#"{ "dependencies": { "a": "1.5.0" } }"#);

        let deltas = diff_manifests(&old, &new);
        assert_eq!(deltas.len(), 2);
        assert_eq!(
            deltas[0].kind,
            DeltaKind::Downgraded {
                from: Version::new(2, 0, 0),
                to: Version::new(1, 5, 0),
            }
        );
        assert_eq!(deltas[1].kind, DeltaKind::Removed);
    }

    #[tokio::test]
    async fn renders_plain_text_lines_without_lookups() {
        let old = manifest(r#"{ "dependencies": { "a": "1.0.0" } }"#);
        let new = manifest(r#"{ "dependencies": { "a": "2.0.0", "b": "1.0.0" } }"#);
        let deltas = diff_manifests(&old, &new);

        let rendered = render_deltas(&deltas, &LinkResolver::disabled()).await;
        assert_eq!(
            rendered,
            "- update a to 2.0.0 (from 1.0.0)\n- depend upon b 1.0.0\n"
        );
    }
}
