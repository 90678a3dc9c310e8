//! cli::commands::product
//!
//! `shipwright product`: release every repository of the configured
//! product.

use std::path::Path;

use anyhow::bail;

use crate::cli::Context;
use crate::core::config::ProductConfig;
use crate::release::product::release_product;
use crate::ui::output;

pub async fn run(context: &Context, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !context.interactive {
        bail!("product releases are interactive; run from a terminal without --no-interactive");
    }

    let config = ProductConfig::load(config_path)?;
    output::debug(
        format!(
            "product config: owner \"{}\", {} repositories",
            config.owner,
            config.repositories.len()
        ),
        context.verbosity,
    );

    release_product(&config, context.interactive, context.verbosity).await?;
    Ok(())
}
