//! Site building logic - orchestrates checking, rendering, and assembly.

use crate::{
    check,
    config::Config,
    frontmatter::parse_frontmatter,
    markdown::MarkdownProcessor,
    models::*,
    source,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] crate::frontmatter::FrontmatterError),

    #[error("markup check failed with {} error(s)", .diagnostics.iter().filter(|d| d.severity == DiagnosticSeverity::Error).count())]
    Markup { diagnostics: Vec<Diagnostic> },
}

/// Main site builder.
///
/// Builds are pure: the same source tree and configuration produce the same
/// `Site`, and nothing on disk is touched. Writing output is the caller's
/// job, which keeps a failed build from disturbing a previous one.
pub struct SiteBuilder {
    config: Config,
    processor: MarkdownProcessor,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: MarkdownProcessor::new(),
        }
    }

    /// Build the entire site
    pub fn build(&self) -> Result<Site, BuildError> {
        let documents = source::collect_documents(&self.config)?;
        let assets = source::collect_assets(&self.config)?;

        // Check every document before rendering any of them
        let mut diagnostics = check::check_documents(&documents);

        let mut pages = Vec::new();
        if !check::has_errors(&diagnostics) {
            for doc in &documents {
                if let Some(page) = self.render_document(doc)? {
                    pages.push(page);
                }
            }

            // A source file named like a generated page would be silently
            // overwritten when assets are copied; refuse instead
            for asset in &assets {
                if pages.iter().any(|p| &p.output_rel_path == asset) {
                    diagnostics.push(Diagnostic::error(
                        "output.duplicate",
                        format!("source file '{}' collides with a generated page", asset),
                        asset,
                        None,
                    ));
                }
            }
        }

        if check::has_errors(&diagnostics) {
            for diag in &diagnostics {
                if diag.severity == DiagnosticSeverity::Error {
                    tracing::error!("{}: {}", diag.location(), diag.message);
                }
            }
            return Err(BuildError::Markup { diagnostics });
        }

        for diag in &diagnostics {
            tracing::warn!("{}: {}", diag.location(), diag.message);
        }

        pages.sort_by(|a, b| a.output_rel_path.cmp(&b.output_rel_path));

        tracing::info!("Rendered {} pages", pages.len());

        Ok(Site {
            pages,
            assets,
            diagnostics,
        })
    }

    /// Render one document into a page; drafts yield `None`
    fn render_document(&self, doc: &Document) -> Result<Option<Page>, BuildError> {
        let (frontmatter, body) = parse_frontmatter(&doc.text)?;

        if frontmatter.draft {
            tracing::debug!("Skipping draft {}", doc.source_path);
            return Ok(None);
        }

        let (html, toc_html) = self.processor.convert(&body);

        // Fall back to the first heading, then the filename, when
        // frontmatter carries no title
        let title = match frontmatter.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self
                .processor
                .first_heading(&body)
                .unwrap_or_else(|| doc.file_stem().to_string()),
        };

        let date = frontmatter
            .date
            .as_ref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(Some(Page {
            output_rel_path: doc.output_rel_path(),
            source_path: doc.source_path.clone(),
            title,
            description: frontmatter.description.clone(),
            date,
            weight: frontmatter.weight.unwrap_or(0),
            html,
            toc_html,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const CONFIG_YAML: &str = r#"
site:
  title: "Test Docs"
  author: "Docs Team"
  description: "Test"
  url: "https://docs.example.com"
paths:
  source: "docs"
  output: "public"
"#;

    fn builder_for(root: &Path) -> SiteBuilder {
        fs::write(root.join("galley.yml"), CONFIG_YAML).unwrap();
        let config = Config::from_file(root.join("galley.yml")).unwrap();
        SiteBuilder::new(config)
    }

    #[test]
    fn test_build_renders_pages() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(
            tmp.path().join("docs/example.md"),
            "---\ntitle: Example\n---\n\n# Example\n\nBody text.\n",
        )
        .unwrap();

        let site = builder_for(tmp.path()).build().unwrap();
        assert_eq!(site.pages.len(), 1);
        assert_eq!(site.pages[0].output_rel_path, "example.html");
        assert_eq!(site.pages[0].title, "Example");
        assert!(site.pages[0].html.contains("<h1"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(
            tmp.path().join("docs/a.md"),
            "# A\n\n```html\n<p>x</p>\n```\n",
        )
        .unwrap();
        fs::write(tmp.path().join("docs/b.md"), "# B\n\nmore text\n").unwrap();

        let builder = builder_for(tmp.path());
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();

        let render = |site: &Site| {
            site.pages
                .iter()
                .map(|p| format!("{}\n{}", p.output_rel_path, p.html))
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn test_unterminated_fence_fails_build() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(
            tmp.path().join("docs/broken.md"),
            "# Broken\n\n```html\n<p>never closed\n",
        )
        .unwrap();

        let err = builder_for(tmp.path()).build().unwrap_err();
        match err {
            BuildError::Markup { diagnostics } => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].location(), "broken.md:3");
            }
            other => panic!("expected markup error, got {}", other),
        }
    }

    #[test]
    fn test_title_fallbacks() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("docs/heading.md"), "# From Heading\n").unwrap();
        fs::write(tmp.path().join("docs/bare.md"), "just prose\n").unwrap();

        let site = builder_for(tmp.path()).build().unwrap();
        let titles: Vec<&str> = site.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["bare", "From Heading"]);
    }

    #[test]
    fn test_drafts_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(
            tmp.path().join("docs/wip.md"),
            "---\ntitle: WIP\ndraft: true\n---\n\nnot yet\n",
        )
        .unwrap();
        fs::write(tmp.path().join("docs/done.md"), "# Done\n").unwrap();

        let site = builder_for(tmp.path()).build().unwrap();
        assert_eq!(site.pages.len(), 1);
        assert_eq!(site.pages[0].source_path, "done.md");
    }

    #[test]
    fn test_asset_collision_fails_build() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("docs/guide.md"), "# Guide\n").unwrap();
        fs::write(tmp.path().join("docs/guide.html"), "<html></html>\n").unwrap();

        let err = builder_for(tmp.path()).build().unwrap_err();
        match err {
            BuildError::Markup { diagnostics } => {
                assert_eq!(diagnostics[0].code, "output.duplicate");
            }
            other => panic!("expected markup error, got {}", other),
        }
    }

    #[test]
    fn test_build_touches_nothing_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("docs/a.md"), "# A\n").unwrap();

        builder_for(tmp.path()).build().unwrap();
        assert!(!tmp.path().join("public").exists());
    }
}
