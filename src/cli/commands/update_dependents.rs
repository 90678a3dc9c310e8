//! cli::commands::update_dependents
//!
//! `shipwright update-dependents`: after releasing the package in the
//! current directory, open dependency-bump branches in every product
//! repository that depends on it.
//!
//! Each accepted bump becomes a branch named after the prompted ticket,
//! carrying a single `npm install --package-lock-only` commit. Branches
//! are pushed and the pull request URLs are printed at the end; nothing
//! is merged automatically.

use std::path::Path;

use anyhow::{bail, Context as _};

use crate::cli::Context;
use crate::core::config::{ProductConfig, ProductRepository};
use crate::core::manifest::PackageManifest;
use crate::git::{self, Git};
use crate::plugins::create_plugin;
use crate::process;
use crate::release::workspace::Workspace;
use crate::ui::output;
use crate::ui::prompts;

pub async fn run(context: &Context, config_path: Option<&Path>) -> anyhow::Result<()> {
    let manifest = PackageManifest::read(&context.cwd)
        .context("update-dependents must run inside the released package")?;
    let Some(package_name) = manifest.name else {
        bail!("package.json has no \"name\"");
    };
    let Some(package_version) = manifest.version else {
        bail!("package.json has no \"version\"");
    };

    let config = ProductConfig::load(config_path)?;
    let ticket = prompts::ticket(context.interactive)?;

    let mut pull_requests = Vec::new();
    for repository in &config.repositories {
        if repository.name == package_name {
            continue;
        }
        output::print("", context.verbosity);
        output::print(
            output::info_text(format!("── {} ──", repository.label)),
            context.verbosity,
        );

        if let Some(url) = update_one(
            context,
            &config,
            repository,
            &package_name,
            &package_version,
            &ticket,
        )
        .await?
        {
            pull_requests.push(url);
        }
    }

    output::print("", context.verbosity);
    if pull_requests.is_empty() {
        output::print(
            output::subdued_text("No dependency updates were made."),
            context.verbosity,
        );
    } else {
        output::print(
            output::panel(Some("Pull requests"), &pull_requests.join("\n")),
            context.verbosity,
        );
    }
    Ok(())
}

/// Clone one repository and, when it depends on the released package and
/// the user confirms, push a dependency-bump branch.
///
/// Returns the pull request URL for the pushed branch.
async fn update_one(
    context: &Context,
    config: &ProductConfig,
    repository: &ProductRepository,
    package_name: &str,
    package_version: &str,
    ticket: &str,
) -> anyhow::Result<Option<String>> {
    let project_file = repository
        .project_file
        .as_ref()
        .and_then(|path| path.to_str());

    let workspace = Workspace::create(&repository.name)?;
    git::clone(&config.clone_url(repository), workspace.repository_dir())?;
    let cwd = workspace.repository_dir();

    let plugin = create_plugin(cwd, Some(repository.kind), project_file)?;
    if !plugin.supports_dependency_updates() {
        output::print(
            output::subdued_text(format!(
                "\"{}\" repositories do not take dependency updates.",
                plugin.display_type()
            )),
            context.verbosity,
        );
        return Ok(None);
    }

    let manifest = PackageManifest::read(cwd)?;
    let Some(current_range) = manifest.dependencies.get(package_name) else {
        output::print(
            output::subdued_text(format!(
                "\"{}\" does not depend on \"{package_name}\".",
                repository.name
            )),
            context.verbosity,
        );
        return Ok(None);
    };
    if current_range == &format!("^{package_version}") {
        output::print(
            output::subdued_text(format!(
                "\"{}\" already depends on \"{package_name}\" {current_range}.",
                repository.name
            )),
            context.verbosity,
        );
        return Ok(None);
    }

    if !prompts::confirm_dependency_update(
        &repository.name,
        package_name,
        current_range,
        package_version,
        context.interactive,
    )? {
        return Ok(None);
    }

    let git = Git::open(cwd)?;
    git.checkout_new_branch(ticket)?;
    process::run(
        "npm",
        &[
            "install",
            &format!("{package_name}@{package_version}"),
            "--package-lock-only",
            "--save",
        ],
        cwd,
    )?;
    git.stage_all()?;
    git.commit(&format!(
        "{ticket} # Bumped \"{package_name}\" to {package_version}"
    ))?;
    git.push_new_branch(ticket)?;

    Ok(Some(config.new_pull_request_url(repository, ticket)))
}
