//! Slug generation for heading ids and anchor links.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace and underscores with hyphens
/// - Remove special characters (except hyphens)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use galley_core::slugify;
///
/// assert_eq!(slugify("Rendering Forms"), "rendering-forms");
/// assert_eq!(slugify("Widgets & Fields"), "widgets-fields");
/// assert_eq!(slugify("C++ Samples"), "c-samples");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    // Replace whitespace and underscores with hyphens
    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    // Keep alphanumerics, hyphens, and unicode alphabetics; drop the rest
    let cleaned = with_hyphens
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_ascii_alphanumeric() || c == '-' {
                Some(g)
            } else if c.is_alphabetic() {
                Some(g)
            } else {
                None
            }
        })
        .collect::<String>();

    let collapsed = HYPHEN_RUNS.replace_all(&cleaned, "-");

    collapsed.trim_matches('-').to_string()
}
