//! Frontmatter parsing from markdown files.

use crate::models::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n(.*)$").unwrap())
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body). If no frontmatter block is
/// present the whole content is the body and the frontmatter is defaulted;
/// none of the fields are required.
///
/// # Example
///
/// ```
/// use galley_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: Rendering Forms\ndate: 2025-01-01\n---\n# Hello\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title.as_deref(), Some("Rendering Forms"));
/// assert_eq!(fm.date, Some("2025-01-01".to_string()));
/// assert!(body.trim().starts_with("# Hello"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, String), FrontmatterError> {
    let re = frontmatter_regex();

    if let Some(captures) = re.captures(content) {
        let yaml = captures.get(1).unwrap().as_str();
        let body = captures.get(2).unwrap().as_str();

        let frontmatter: Frontmatter = serde_yaml::from_str(yaml)?;
        Ok((frontmatter, body.to_string()))
    } else {
        Ok((Frontmatter::default(), content.to_string()))
    }
}

/// Number of lines the frontmatter block occupies, delimiters included.
///
/// Line numbers reported for the markdown body are offset by this amount so
/// diagnostics point at the file as the author sees it. Zero when the content
/// has no frontmatter block.
pub fn body_line_offset(content: &str) -> usize {
    let re = frontmatter_regex();
    match re.captures(content) {
        // Opening "---", the YAML lines, closing "---"
        Some(captures) => captures.get(1).unwrap().as_str().lines().count() + 2,
        None => 0,
    }
}
