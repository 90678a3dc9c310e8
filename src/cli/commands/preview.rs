//! cli::commands::preview
//!
//! `shipwright changelog-preview`: show the pending changelog entries
//! without releasing. Exits non-zero when there are no entry files, so
//! CI can require every change to ship a changelog fragment.

use anyhow::bail;

use crate::changelog::next_release_entries;
use crate::cli::Context;
use crate::plugins::create_plugin;
use crate::ui::output;

pub async fn run(context: &Context) -> anyhow::Result<()> {
    let plugin = create_plugin(&context.cwd, None, None)?;
    let preview = next_release_entries(plugin.as_ref()).await?;

    if preview.entry_files.is_empty() {
        bail!(
            "no changelog entry files found; add one under \"changelog-entries/\" \
             before releasing"
        );
    }

    let files: Vec<String> = preview
        .entry_files
        .iter()
        .map(|entry_file| {
            entry_file
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry_file.path.display().to_string())
        })
        .collect();
    output::print(
        output::panel(Some("Entry files"), &files.join("\n")),
        context.verbosity,
    );
    output::print("", context.verbosity);
    output::print(
        output::panel(Some("Next release"), &preview.entries),
        context.verbosity,
    );
    Ok(())
}
