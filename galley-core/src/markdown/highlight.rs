//! Code syntax highlighting using syntect.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::html_escape;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Theme> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        theme_set
            .themes
            .get("InspiredGitHub")
            .or_else(|| theme_set.themes.get("base16-ocean.light"))
            .unwrap()
            .clone()
    })
}

/// Transformer for syntax highlighting code blocks
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Transform events, replacing fenced code blocks with highlighted HTML.
    ///
    /// Fences without a language become plain escaped `<pre><code>` blocks;
    /// everything else goes through syntect.
    pub fn transform(&self, events: Vec<Event<'_>>) -> Vec<Event<'static>> {
        let mut result = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    in_code_block = true;
                    code_lang = Some(language_token(&info));
                    code_content.clear();
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if in_code_block => {
                    in_code_block = false;

                    let rendered = match code_lang.take() {
                        Some(lang) if !lang.is_empty() => {
                            self.highlight_code(&code_content, &lang)
                        }
                        _ => format!("<pre><code>{}</code></pre>\n", html_escape(&code_content)),
                    };
                    result.push(Event::Html(CowStr::Boxed(rendered.into_boxed_str())));
                }
                _ => {
                    result.push(event.into_static());
                }
            }
        }

        result
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
            .unwrap_or_else(|| ss.find_syntax_plain_text());

        match highlighted_html_for_string(code, ss, syntax, theme()) {
            Ok(html) => html,
            Err(_) => {
                // Fallback to plain code block
                format!("<pre><code>{}</code></pre>\n", html_escape(code))
            }
        }
    }
}

impl Default for HighlightTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// First token of the fence info string ("rust,no_run" and "rust ignore"
/// both highlight as rust)
fn language_token(info: &str) -> String {
    info.split([' ', '\t', ','])
        .next()
        .unwrap_or("")
        .to_string()
}
