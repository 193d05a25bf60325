//! Publish command: push built output to the configured target.

use anyhow::{Context, Result};
use galley_core::{publish_site, Config};
use std::path::Path;

/// Publish the output directory from a previous build.
///
/// The publisher itself refuses a missing or empty output directory, so
/// running this before ever building fails cleanly.
pub fn publish_output(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let target = config
        .publish_target()
        .context("No publish target configured")?;

    let summary = publish_site(&config.output_dir(), &target).context("Publish failed")?;

    println!(
        "✓ Published {} files to {}",
        summary.files, summary.destination
    );

    Ok(())
}
