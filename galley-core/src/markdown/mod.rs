//! Markdown to HTML conversion pipeline.

pub mod highlight;
pub mod links;

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::collections::HashMap;

pub use highlight::HighlightTransformer;
pub use links::LinkRewriteTransformer;

#[derive(Debug, Clone)]
struct TocItem {
    level: u32,
    title: String,
    id: String,
}

/// Markdown processor shared by every page render in a build
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Convert markdown to HTML.
    ///
    /// Returns a tuple of (html, toc_html). The table of contents covers
    /// second-level headings and below; pages with none get no TOC.
    pub fn convert(&self, markdown: &str) -> (String, Option<String>) {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();

        // Collect headings for TOC and later ID injection
        let headings = collect_headings(&events);

        // Rewrite document-relative .md links to their .html output paths
        let link_transformer = LinkRewriteTransformer::new();
        let events = link_transformer.transform(events);

        // Inject heading ids to match TOC anchors
        let events = attach_heading_ids(events, &headings);
        let events = add_heading_anchors(events);

        // Apply syntax highlighting to code blocks
        let highlight_transformer = HighlightTransformer::new();
        let events = highlight_transformer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        let toc_html = render_toc(&headings);

        (html_output, toc_html)
    }

    /// First level-one heading in the document, used as a title fallback
    pub fn first_heading(&self, markdown: &str) -> Option<String> {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();
        collect_headings(&events)
            .into_iter()
            .find(|h| h.level == 1)
            .map(|h| h.title)
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_headings(events: &[Event]) -> Vec<TocItem> {
    let mut toc: Vec<TocItem> = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::new();
    let mut current: Option<(u32, String, Option<String>)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                let explicit = id.as_ref().map(|s| s.to_string());
                current = Some((*level as u32, String::new(), explicit));
            }
            Event::Text(text) => {
                if let Some((_, ref mut title, _)) = current {
                    title.push_str(text.as_ref());
                }
            }
            Event::Code(code) => {
                if let Some((_, ref mut title, _)) = current {
                    title.push_str(code.as_ref());
                }
            }
            Event::End(pulldown_cmark::TagEnd::Heading(_)) => {
                if let Some((level, title, explicit)) = current.take() {
                    // An explicit {#id} attribute wins over the slugified
                    // title; repeated headings get -2, -3, ... suffixes
                    let id = match explicit {
                        Some(id) => id,
                        None => {
                            let base = slugify(&title);
                            let id = match seen_ids.get(&base) {
                                None => base.clone(),
                                Some(n) => format!("{}-{}", base, n + 1),
                            };
                            *seen_ids.entry(base).or_insert(0) += 1;
                            id
                        }
                    };
                    toc.push(TocItem { level, title, id });
                }
            }
            _ => {}
        }
    }

    toc
}

fn attach_heading_ids(
    mut events: Vec<Event<'static>>,
    headings: &[TocItem],
) -> Vec<Event<'static>> {
    let mut heading_iter = headings.iter();
    let mut result = Vec::with_capacity(events.len());

    for event in events.drain(..) {
        match event {
            Event::Start(Tag::Heading {
                level,
                mut id,
                classes,
                attrs,
            }) => {
                if id.is_none() {
                    if let Some(next) = heading_iter.next() {
                        id = Some(CowStr::Boxed(next.id.clone().into_boxed_str()));
                    }
                } else {
                    // Explicit {#id} attribute: keep it, but stay in step
                    heading_iter.next();
                }
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            _ => result.push(event),
        }
    }

    result
}

fn add_heading_anchors(events: Vec<Event<'static>>) -> Vec<Event<'static>> {
    let mut result = Vec::with_capacity(events.len());
    let mut current_id: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                current_id = id.as_ref().map(|s| s.to_string());
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::End(pulldown_cmark::TagEnd::Heading(level)) => {
                if let Some(id) = current_id.take() {
                    let anchor = format!(
                        "<a class=\"anchor\" href=\"#{}\" aria-label=\"Link to heading\">#</a>",
                        html_escape(&id)
                    );
                    result.push(Event::Html(CowStr::Boxed(anchor.into_boxed_str())));
                }
                result.push(Event::End(pulldown_cmark::TagEnd::Heading(level)));
            }
            other => result.push(other),
        }
    }

    result
}

/// Render a flat TOC list from level-two-and-below headings
fn render_toc(headings: &[TocItem]) -> Option<String> {
    let entries: Vec<&TocItem> = headings.iter().filter(|h| h.level >= 2).collect();
    if entries.is_empty() {
        return None;
    }

    let mut html = String::from(r#"<nav class="toc"><h3>On this page</h3><ul>"#);
    for h in entries {
        html.push_str(&format!(
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            h.level,
            h.id,
            html_escape(&h.title)
        ));
    }
    html.push_str("</ul></nav>");
    Some(html)
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
