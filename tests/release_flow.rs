//! End-to-end release tests against real git repositories.

use std::path::Path;
use std::process::Command;

use semver::Version;
use shipwright::changelog::{self, Changelog};
use shipwright::plugins::{DotnetPlugin, NpmPlugin};
use shipwright::release::{release_repository, ReleaseError, ReleaseOptions};

fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {args:?} failed");
    String::from_utf8(output.stdout).unwrap()
}

fn init_repo(dir: &Path) {
    run_git(dir, &["init", "-b", "main"]);
    run_git(dir, &["config", "user.email", "test@example.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
}

const CHANGELOG: &str = "# Changelog\n\n## Unreleased\n\n\
## [1.0.0] - 2024-01-01\n\nInitial release.\n";

const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <PackageVersion>1.0.0</PackageVersion>
    <AssemblyVersion>1.0.0.0</AssemblyVersion>
  </PropertyGroup>
</Project>
"#;

/// Full release of a .NET repository: changelog rewritten, version
/// marker bumped, release commit pushed, annotated tag on the remote.
#[tokio::test]
async fn dotnet_release_commits_and_tags() {
    let remote = tempfile::tempdir().unwrap();
    run_git(remote.path(), &["init", "--bare", "-b", "main"]);

    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    std::fs::write(dir.path().join("Example.csproj"), PROJECT).unwrap();
    let entries = dir.path().join("changelog-entries");
    std::fs::create_dir(&entries).unwrap();
    std::fs::write(entries.join("feature.md"), "### Added\n- new feature\n").unwrap();
    run_git(dir.path(), &["add", "-A"]);
    run_git(dir.path(), &["commit", "-m", "initial"]);
    run_git(dir.path(), &["tag", "-a", "v1.0.0", "-m", "v1.0.0"]);
    run_git(
        dir.path(),
        &["remote", "add", "origin", remote.path().to_str().unwrap()],
    );
    run_git(dir.path(), &["push", "-u", "origin", "main"]);

    let plugin = DotnetPlugin::new(dir.path(), "Example.csproj");
    let released = release_repository(
        &plugin,
        &ReleaseOptions {
            next_version: "1.1.0".to_string(),
            release_name: Some("Osprey".to_string()),
            git: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(released, Version::new(1, 1, 0));

    let changelog_text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    let rewritten = Changelog::parse(&changelog_text).unwrap();
    assert_eq!(rewritten.unreleased().unwrap().body, "");
    let section = &rewritten.sections[1];
    assert_eq!(section.version, Some(Version::new(1, 1, 0)));
    assert!(section.body.starts_with("##### Release Name: Osprey"));
    assert!(section.body.contains("- new feature"));

    let project = std::fs::read_to_string(dir.path().join("Example.csproj")).unwrap();
    assert!(project.contains("<PackageVersion>1.1.0</PackageVersion>"));
    assert!(project.contains("<AssemblyVersion>1.1.0.0</AssemblyVersion>"));

    assert!(!entries.join("feature.md").exists());

    // Commit message and tag, as seen by the remote.
    let remote_log = git_stdout(
        remote.path(),
        &["log", "-1", "--format=%s", "refs/heads/main"],
    );
    assert_eq!(remote_log.trim(), "[RELEASE] 1.1.0 - Osprey");
    let remote_tags = git_stdout(remote.path(), &["tag", "--list"]);
    assert!(remote_tags.lines().any(|tag| tag == "v1.1.0"));
}

/// A git sub-step failure stops the sequence where it happened. With no
/// push destination configured the release fails at the push, leaving
/// the release commit in place and no tag created.
#[tokio::test]
async fn failed_push_aborts_before_tagging() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    std::fs::write(dir.path().join("Example.csproj"), PROJECT).unwrap();
    run_git(dir.path(), &["add", "-A"]);
    run_git(dir.path(), &["commit", "-m", "initial"]);
    // No origin remote.

    let plugin = DotnetPlugin::new(dir.path(), "Example.csproj");
    let result = release_repository(
        &plugin,
        &ReleaseOptions {
            next_version: "1.1.0".to_string(),
            release_name: None,
            git: true,
        },
    )
    .await;
    assert!(matches!(result, Err(ReleaseError::Git(_))));

    // The release commit landed before the push failed; tagging never
    // ran.
    let log = git_stdout(dir.path(), &["log", "-1", "--format=%s"]);
    assert_eq!(log.trim(), "[RELEASE] 1.1.0");
    let tags = git_stdout(dir.path(), &["tag", "--list"]);
    assert!(tags.lines().all(|tag| tag != "v1.1.0"));
}

/// A previous release heading without a matching `v<version>` tag
/// degrades to a warning: the dependencies block is omitted and the
/// changelog rewrite still succeeds.
#[tokio::test]
async fn missing_previous_tag_omits_the_dependencies_block() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "example", "version": "1.0.0", "dependencies": { "lodash": "^4.0.0" } }"#,
    )
    .unwrap();
    run_git(dir.path(), &["add", "-A"]);
    run_git(dir.path(), &["commit", "-m", "initial"]);
    // No v1.0.0 tag.

    let plugin = NpmPlugin::with_links(
        dir.path(),
        shipwright::diff::LinkResolver::disabled(),
    );
    changelog::add_next_release(&plugin, &Version::new(1, 1, 0), None)
        .await
        .unwrap();

    let text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    assert!(text.contains("## [1.1.0]"));
    assert!(!text.contains("### Dependencies"));
}

/// With the previous tag in place, manifest changes since it land under
/// a "### Dependencies" heading in the new section.
#[tokio::test]
async fn dependency_changes_since_the_previous_tag_are_recorded() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "example", "version": "1.0.0", "dependencies": { "lodash": "^4.0.0" } }"#,
    )
    .unwrap();
    run_git(dir.path(), &["add", "-A"]);
    run_git(dir.path(), &["commit", "-m", "initial"]);
    run_git(dir.path(), &["tag", "-a", "v1.0.0", "-m", "v1.0.0"]);

    std::fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "example", "version": "1.0.0", "dependencies": { "lodash": "^5.0.0", "left-pad": "1.3.0" } }"#,
    )
    .unwrap();

    let plugin = NpmPlugin::with_links(
        dir.path(),
        shipwright::diff::LinkResolver::disabled(),
    );
    changelog::add_next_release(&plugin, &Version::new(1, 1, 0), None)
        .await
        .unwrap();

    let text = std::fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
    let rewritten = Changelog::parse(&text).unwrap();
    let section = &rewritten.sections[1];
    assert!(section.body.contains("### Dependencies"));
    assert!(section.body.contains("- depend upon left-pad 1.3.0"));
    assert!(section.body.contains("- update lodash to 5.0.0 (from 4.0.0)"));
}
