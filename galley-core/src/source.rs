//! Source collection: discover and read the markdown tree.

use crate::config::Config;
use crate::models::Document;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Collect every markdown document under the configured source directory.
///
/// Paths matching an ignore pattern are skipped. Documents are returned in
/// sorted source-path order so every build sees the same sequence.
pub fn collect_documents(config: &Config) -> io::Result<Vec<Document>> {
    let source_dir = config.source_dir();
    let ignore_patterns = compile_ignore_patterns(&config.ignore_patterns);

    let mut documents = Vec::new();

    for entry in WalkDir::new(&source_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if entry.path().extension().map(|ext| ext == "md") != Some(true) {
            continue;
        }

        let rel = relative_source_path(entry.path(), &source_dir);
        if should_ignore(&rel, &ignore_patterns) {
            tracing::debug!("Ignoring {} due to ignore_patterns", rel);
            continue;
        }

        let text = fs::read_to_string(entry.path())?;
        documents.push(Document {
            source_path: rel,
            text,
        });
    }

    documents.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    tracing::info!("Found {} markdown files", documents.len());

    Ok(documents)
}

/// Collect non-markdown files that should be copied into the site verbatim.
///
/// Images and other files referenced from documents live alongside them in
/// the source tree. Hidden entries and ignore-pattern matches are skipped.
pub fn collect_assets(config: &Config) -> io::Result<Vec<String>> {
    let source_dir = config.source_dir();
    let ignore_patterns = compile_ignore_patterns(&config.ignore_patterns);

    let mut assets = Vec::new();

    for entry in WalkDir::new(&source_dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if entry.path().extension().map(|ext| ext == "md") == Some(true) {
            continue;
        }

        let rel = relative_source_path(entry.path(), &source_dir);
        if should_ignore(&rel, &ignore_patterns) {
            continue;
        }

        assets.push(rel);
    }

    assets.sort();

    Ok(assets)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn relative_source_path(path: &Path, source_dir: &Path) -> String {
    let rel = path.strip_prefix(source_dir).unwrap_or(path);
    // Forward slashes regardless of platform; these become URL paths
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid ignore pattern '{}': {}", pat, err),
        }
    }
    compiled
}

fn should_ignore(path: &str, ignores: &[Regex]) -> bool {
    ignores.iter().any(|re| re.is_match(path))
}
