//! Content model structs for documents, pages, and build results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Frontmatter metadata from markdown files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub weight: Option<i64>,

    #[serde(default)]
    pub draft: bool,
}

/// A single markdown source file, read once per build and never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the source root (e.g., "guide/widgets.md")
    pub source_path: String,

    /// Raw file content, frontmatter included
    pub text: String,
}

impl Document {
    /// Relative output path derived from the source path (no leading slash).
    ///
    /// The source tree shape is preserved: "guide/widgets.md" maps to
    /// "guide/widgets.html".
    pub fn output_rel_path(&self) -> String {
        let stripped = self
            .source_path
            .strip_suffix(".md")
            .unwrap_or(&self.source_path);
        format!("{}.html", stripped)
    }

    /// File stem of the source path, used as the last-resort title.
    pub fn file_stem(&self) -> &str {
        let name = self
            .source_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.source_path);
        name.strip_suffix(".md").unwrap_or(name)
    }
}

/// A rendered page ready for templating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Relative output path (e.g., "guide/widgets.html")
    pub output_rel_path: String,

    /// Source path this page was rendered from
    pub source_path: String,

    /// Display title
    pub title: String,

    /// Optional description from frontmatter
    pub description: Option<String>,

    /// Publication date from frontmatter
    pub date: Option<NaiveDate>,

    /// Ordering weight for navigation (lower sorts first)
    pub weight: i64,

    /// Rendered HTML body
    pub html: String,

    /// Table of contents HTML, when the page has headings
    pub toc_html: Option<String>,
}

impl Page {
    /// URL for this page including a base path
    pub fn url_with_base(&self, base_url: &str) -> String {
        format!(
            "{}{}",
            crate::config::normalize_base_url(base_url),
            self.output_rel_path
        )
    }
}

/// Built site: rendered pages, passthrough assets, non-fatal diagnostics
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub pages: Vec<Page>,

    /// Non-markdown source files copied into the output verbatim,
    /// as paths relative to the source root
    pub assets: Vec<String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl Site {
    /// Find a page by its relative output path
    pub fn find_by_output_path(&self, rel: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.output_rel_path == rel)
    }

    /// Whether the source tree provides its own root index page
    pub fn has_root_index(&self) -> bool {
        self.pages.iter().any(|p| p.output_rel_path == "index.html")
    }
}

/// Summary of a completed build; the publisher only accepts output that a
/// successful build reported.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Absolute output directory the site was written to
    pub output_dir: PathBuf,

    /// Relative paths of every file written, sorted
    pub files: Vec<String>,
}

impl BuildReport {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A single check finding, tied to a source file and line where possible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code (e.g., "fence.unterminated")
    pub code: String,

    pub message: String,

    pub severity: DiagnosticSeverity,

    /// Source path relative to the source root
    pub path: Option<String>,

    /// One-based line number in the source file
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn error(code: &str, message: String, path: &str, line: Option<usize>) -> Self {
        Self {
            code: code.to_string(),
            message,
            severity: DiagnosticSeverity::Error,
            path: Some(path.to_string()),
            line,
        }
    }

    pub fn warning(code: &str, message: String, path: &str, line: Option<usize>) -> Self {
        Self {
            code: code.to_string(),
            message,
            severity: DiagnosticSeverity::Warning,
            path: Some(path.to_string()),
            line,
        }
    }

    /// Render as "path:line: message" for logs and CLI output
    pub fn location(&self) -> String {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => format!("{}:{}", path, line),
            (Some(path), None) => path.clone(),
            _ => String::from("<source>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_preserves_tree() {
        let doc = Document {
            source_path: "guide/widgets.md".into(),
            text: String::new(),
        };
        assert_eq!(doc.output_rel_path(), "guide/widgets.html");
        assert_eq!(doc.file_stem(), "widgets");
    }

    #[test]
    fn test_output_path_root_file() {
        let doc = Document {
            source_path: "index.md".into(),
            text: String::new(),
        };
        assert_eq!(doc.output_rel_path(), "index.html");
        assert_eq!(doc.file_stem(), "index");
    }

    #[test]
    fn test_page_url_with_base() {
        let page = Page {
            output_rel_path: "guide/widgets.html".into(),
            source_path: "guide/widgets.md".into(),
            title: "Widgets".into(),
            description: None,
            date: None,
            weight: 0,
            html: String::new(),
            toc_html: None,
        };
        assert_eq!(page.url_with_base("/"), "/guide/widgets.html");
        assert_eq!(page.url_with_base("/docs"), "/docs/guide/widgets.html");
    }

    #[test]
    fn test_diagnostic_location() {
        let diag = Diagnostic::error("fence.unterminated", "unterminated fence".into(), "a.md", Some(12));
        assert_eq!(diag.location(), "a.md:12");

        let diag = Diagnostic::warning("date.invalid", "bad date".into(), "b.md", None);
        assert_eq!(diag.location(), "b.md");
    }
}
