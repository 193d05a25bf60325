//! Askama template definitions.

use askama::Template;
use galley_core::Page;

/// A page entry for generated listings
#[derive(Debug, Clone)]
pub struct PageEntry {
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl PageEntry {
    pub fn from_page(page: &Page, base_url: &str) -> Self {
        Self {
            url: page.url_with_base(base_url),
            title: page.title.clone(),
            date: page.date.map(|d| d.format("%Y-%m-%d").to_string()),
            description: page.description.clone(),
        }
    }
}

/// A directory of pages in the navigation tree
#[derive(Debug, Clone)]
pub struct NavNode {
    pub name: String,
    pub pages: Vec<PageEntry>,
    pub subdirs: Vec<NavNode>,
}

impl NavNode {
    /// Render this directory node and its children to HTML.
    ///
    /// A node with an empty name is the tree root: its pages and
    /// subdirectories render bare, without the enclosing details element.
    pub fn render_to_html(&self) -> String {
        let mut html = String::new();

        if self.name.is_empty() {
            render_page_list(&mut html, &self.pages);
            for subdir in &self.subdirs {
                html.push_str(&subdir.render_to_html());
            }
            return html;
        }

        html.push_str("<details class=\"nav-node\" open>\n");
        html.push_str(&format!(
            "  <summary class=\"nav-dir\">{}/</summary>\n",
            html_escape(&self.name)
        ));

        if !self.subdirs.is_empty() {
            html.push_str("  <div class=\"nav-subdirs\">\n");
            for subdir in &self.subdirs {
                html.push_str(&subdir.render_to_html());
            }
            html.push_str("  </div>\n");
        }

        render_page_list(&mut html, &self.pages);

        html.push_str("</details>\n");
        html
    }
}

fn render_page_list(html: &mut String, pages: &[PageEntry]) {
    if pages.is_empty() {
        return;
    }
    html.push_str("  <ul class=\"nav-pages\">\n");
    for page in pages {
        html.push_str(&format!(
            "    <li><a href=\"{}\">{}</a></li>\n",
            html_escape(&page.url),
            html_escape(&page.title)
        ));
    }
    html.push_str("  </ul>\n");
}

/// HTML escape function to prevent XSS
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Document page template
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    // Page metadata
    pub title: String,
    pub description: String,
    pub date: Option<String>,

    // Content
    pub content: String,
    pub toc_html: Option<String>,

    // Site metadata
    pub site_title: String,
    pub site_author: String,

    // Navigation
    pub nav_home: String,
    pub nav_source: String,
    pub has_source: bool,

    // Path adjustments (for nested pages)
    pub css_path: String,
}

/// Generated index page template, used when the source tree has no
/// root index.md of its own
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    // Site metadata
    pub site_title: String,
    pub site_description: String,
    pub site_author: String,

    // Navigation
    pub nav_home: String,
    pub nav_source: String,
    pub has_source: bool,
    pub css_path: String,

    // Flat page list, in navigation order
    pub items: Vec<PageEntry>,

    // Directory tree view (pre-rendered HTML), set when pages nest
    pub nav_tree_html: Option<String>,
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    // Site metadata
    pub site_title: String,
    pub site_author: String,

    // Navigation
    pub nav_home: String,
    pub nav_source: String,
    pub has_source: bool,
    pub css_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_template_renders() {
        let template = PageTemplate {
            title: "Rendering Forms".to_string(),
            description: "Field by field".to_string(),
            date: Some("2025-01-01".to_string()),
            content: "<h1 id=\"rendering-forms\">Rendering Forms</h1>".to_string(),
            toc_html: None,
            site_title: "Example Docs".to_string(),
            site_author: "Docs Team".to_string(),
            nav_home: "/index.html".to_string(),
            nav_source: "https://github.com/acme/docs".to_string(),
            has_source: true,
            css_path: "/".to_string(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("<title>Rendering Forms - Example Docs</title>"));
        assert!(html.contains("<h1 id=\"rendering-forms\">"));
        assert!(html.contains("2025-01-01"));
        assert!(html.contains("css/galley.css"));
    }

    #[test]
    fn test_page_template_escapes_metadata() {
        let template = PageTemplate {
            title: "Widgets & <Fields>".to_string(),
            description: String::new(),
            date: None,
            content: String::new(),
            toc_html: None,
            site_title: "Docs".to_string(),
            site_author: "Team".to_string(),
            nav_home: "/index.html".to_string(),
            nav_source: String::new(),
            has_source: false,
            css_path: "/".to_string(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("Widgets &amp; &lt;Fields&gt;"));
    }

    #[test]
    fn test_index_template_lists_items() {
        let template = IndexTemplate {
            site_title: "Example Docs".to_string(),
            site_description: "All the docs".to_string(),
            site_author: "Docs Team".to_string(),
            nav_home: "/index.html".to_string(),
            nav_source: String::new(),
            has_source: false,
            css_path: "/".to_string(),
            items: vec![PageEntry {
                url: "/guide/widgets.html".to_string(),
                title: "Widgets".to_string(),
                date: None,
                description: Some("All about widgets".to_string()),
            }],
            nav_tree_html: None,
        };

        let html = template.render().unwrap();
        assert!(html.contains("href=\"/guide/widgets.html\""));
        assert!(html.contains("Widgets"));
        assert!(html.contains("All about widgets"));
    }

    #[test]
    fn test_not_found_template() {
        let template = NotFoundTemplate {
            site_title: "Example Docs".to_string(),
            site_author: "Docs Team".to_string(),
            nav_home: "/index.html".to_string(),
            nav_source: String::new(),
            has_source: false,
            css_path: "/".to_string(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("href=\"/index.html\""));
    }

    #[test]
    fn snapshot_nav_node() {
        let node = NavNode {
            name: "guide".to_string(),
            pages: vec![PageEntry {
                url: "/guide/widgets.html".to_string(),
                title: "Widgets".to_string(),
                date: None,
                description: None,
            }],
            subdirs: Vec::new(),
        };

        insta::assert_snapshot!(node.render_to_html(), @r###"
        <details class="nav-node" open>
          <summary class="nav-dir">guide/</summary>
          <ul class="nav-pages">
            <li><a href="/guide/widgets.html">Widgets</a></li>
          </ul>
        </details>
        "###);
    }
}
