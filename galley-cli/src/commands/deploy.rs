//! Deploy command: build, then publish.

use super::build::build_site_with_report;
use anyhow::{Context, Result};
use galley_core::publish_site;
use std::path::Path;

/// Run the full pipeline. The publish step consumes the report from a
/// successful build; when the build fails this returns before the
/// publisher is ever invoked, leaving the published content as it was.
pub fn deploy_site(config_path: &Path) -> Result<()> {
    let (config, report) = build_site_with_report(config_path)?;

    let target = config
        .publish_target()
        .context("No publish target configured")?;

    let summary = publish_site(&report.output_dir, &target).context("Publish failed")?;

    println!(
        "✓ Deployed {} files to {}",
        summary.files, summary.destination
    );

    Ok(())
}
