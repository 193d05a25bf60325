//! Check command: verify source documents and emit diagnostics.

use anyhow::{Context, Result};
use galley_core::{check_documents, source, Config, Diagnostic, DiagnosticSeverity};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckSummary<'a> {
    documents: usize,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

/// Collect and check the source tree without rendering or writing output.
pub fn check_sources(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let documents = source::collect_documents(&config).context("Failed to read source tree")?;
    let diagnostics = check_documents(&documents);

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Warning)
        .count();

    let summary = CheckSummary {
        documents: documents.len(),
        errors,
        warnings,
        diagnostics: &diagnostics,
    };

    if json {
        let payload = serde_json::to_string_pretty(&summary)?;
        println!("{}", payload);
    } else {
        println!(
            "Checked {} documents: {} errors, {} warnings",
            summary.documents, errors, warnings
        );
        for diag in &diagnostics {
            println!(
                "- {:?} [{}] {}: {}",
                diag.severity,
                diag.code,
                diag.location(),
                diag.message
            );
        }
    }

    if errors > 0 {
        anyhow::bail!("{} markup error(s) found", errors);
    }

    Ok(())
}
