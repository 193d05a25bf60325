//! Rewriting of document-relative markdown links.
//!
//! Authors link between documents by source path ("[guide](guide/widgets.md)")
//! so links work in editors and on code-hosting sites. The built site serves
//! HTML, so those destinations are rewritten to the matching output path.

use pulldown_cmark::{CowStr, Event, Tag};

/// Transformer that maps `.md` link destinations to `.html`
pub struct LinkRewriteTransformer;

impl LinkRewriteTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, events: Vec<Event<'_>>) -> Vec<Event<'static>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest_url = match rewrite_internal_link(&dest_url) {
                        Some(rewritten) => CowStr::Boxed(rewritten.into_boxed_str()),
                        None => dest_url,
                    };
                    Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    })
                    .into_static()
                }
                other => other.into_static(),
            })
            .collect()
    }
}

impl Default for LinkRewriteTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite a link destination when it points at a markdown source file.
///
/// External URLs, mail links, and bare fragments pass through untouched.
/// Fragments on rewritten links are preserved.
fn rewrite_internal_link(dest: &str) -> Option<String> {
    if dest.contains("://") || dest.starts_with("mailto:") || dest.starts_with('#') {
        return None;
    }

    let (path, fragment) = match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (dest, None),
    };

    let stem = path.strip_suffix(".md")?;
    let mut rewritten = format!("{}.html", stem);
    if let Some(fragment) = fragment {
        rewritten.push('#');
        rewritten.push_str(fragment);
    }
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_md_link() {
        assert_eq!(
            rewrite_internal_link("widgets.md"),
            Some("widgets.html".to_string())
        );
        assert_eq!(
            rewrite_internal_link("../guide/widgets.md"),
            Some("../guide/widgets.html".to_string())
        );
    }

    #[test]
    fn test_fragment_preserved() {
        assert_eq!(
            rewrite_internal_link("widgets.md#options"),
            Some("widgets.html#options".to_string())
        );
    }

    #[test]
    fn test_external_and_fragment_links_untouched() {
        assert_eq!(rewrite_internal_link("https://example.com/page.md"), None);
        assert_eq!(rewrite_internal_link("mailto:docs@example.com"), None);
        assert_eq!(rewrite_internal_link("#section"), None);
    }

    #[test]
    fn test_non_markdown_links_untouched() {
        assert_eq!(rewrite_internal_link("diagram.png"), None);
        assert_eq!(rewrite_internal_link("other.html"), None);
    }
}
