//! Build command implementation.

use anyhow::{Context, Result};
use askama::Template;
use galley_core::{
    builder::BuildError, fsops, BuildReport, Config, DiagnosticSeverity, Page, Site, SiteBuilder,
};
use galley_render::{IndexTemplate, NavNode, NotFoundTemplate, PageEntry, PageTemplate};
use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

// Embed the default stylesheet bundle at compile time so it's available
// after cargo install
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static");

/// Build the static site (writes output) and discard the report
pub fn build_site(config_path: &Path) -> Result<()> {
    build_site_with_report(config_path).map(|_| ())
}

/// Build the static site and return the report alongside the loaded config
pub fn build_site_with_report(config_path: &Path) -> Result<(Config, BuildReport)> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(config)
}

/// Build the site from an already loaded config, writing output and
/// returning the report.
pub fn build_site_with_config(config: Config) -> Result<(Config, BuildReport)> {
    tracing::info!("Building site: {}", config.site.title);

    let builder = SiteBuilder::new(config.clone());
    let site = match builder.build() {
        Ok(site) => site,
        Err(BuildError::Markup { diagnostics }) => {
            for diag in &diagnostics {
                if diag.severity == DiagnosticSeverity::Error {
                    eprintln!(
                        "error[{}]: {}: {}",
                        diag.code,
                        diag.location(),
                        diag.message
                    );
                }
            }
            anyhow::bail!("markup check failed; no output was written");
        }
        Err(err) => return Err(err).context("Failed to build site"),
    };

    let base_url = config.normalized_base_url();
    let output_dir = config.output_dir();

    // Every document rendered cleanly; only now is the previous output
    // replaced. The directory is cleared rather than deleted so it may
    // itself be a git worktree.
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;
    fsops::clear_dir(&output_dir, &[".git"]).context("Failed to clear output directory")?;

    for page in &site.pages {
        render_page(&config, page, &base_url)?;
    }

    copy_source_assets(&config, &site)?;

    if !site.has_root_index() && !site.assets.iter().any(|a| a == "index.html") {
        render_index_page(&config, &site, &base_url)?;
    }

    render_404_page(&config, &base_url)?;

    if config.enable_sitemap {
        generate_sitemap(&config, &site, &base_url)?;
    } else {
        tracing::info!("Sitemap disabled; skipping sitemap.xml");
    }

    copy_static_assets(&config)?;

    let report = collect_report(&output_dir)?;

    tracing::info!("✓ Built {} pages", site.pages.len());
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok((config, report))
}

/// Render a single document page
fn render_page(config: &Config, page: &Page, base_url: &str) -> Result<()> {
    let template = PageTemplate {
        title: page.title.clone(),
        description: page
            .description
            .clone()
            .unwrap_or_else(|| page.title.clone()),
        date: page.date.map(|d| d.format("%Y-%m-%d").to_string()),
        content: page.html.clone(),
        toc_html: page.toc_html.clone(),
        site_title: config.site.title.clone(),
        site_author: config.site.author.clone(),
        nav_home: format!("{}index.html", base_url),
        nav_source: config.site.repository.clone().unwrap_or_default(),
        has_source: config.site.repository.is_some(),
        css_path: base_url.to_string(),
    };

    let html = template.render().context("Failed to render page template")?;

    let output_path = config.output_dir().join(&page.output_rel_path);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, html)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    tracing::debug!("Rendered: {}", page.output_rel_path);

    Ok(())
}

/// Copy non-markdown files from the source tree into the output verbatim
fn copy_source_assets(config: &Config, site: &Site) -> Result<()> {
    if site.assets.is_empty() {
        return Ok(());
    }

    let source_dir = config.source_dir();
    let output_dir = config.output_dir();

    for rel in &site.assets {
        let target = output_dir.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source_dir.join(rel), &target)
            .with_context(|| format!("Failed to copy asset to {:?}", target))?;
    }

    tracing::info!("Copied {} source assets", site.assets.len());

    Ok(())
}

/// Render the generated index page. Skipped when the source tree brings
/// its own root index.md (or a hand-written index.html asset).
fn render_index_page(config: &Config, site: &Site, base_url: &str) -> Result<()> {
    let mut nav_pages: Vec<&Page> = site.pages.iter().collect();
    nav_pages.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.title.cmp(&b.title)));

    let items: Vec<PageEntry> = nav_pages
        .iter()
        .map(|p| PageEntry::from_page(p, base_url))
        .collect();

    // Flat sites get a plain list; nested sites get a directory tree
    let nav_tree_html = if site.pages.iter().any(|p| p.output_rel_path.contains('/')) {
        Some(build_nav_tree(&nav_pages, base_url).render_to_html())
    } else {
        None
    };

    let template = IndexTemplate {
        site_title: config.site.title.clone(),
        site_description: config.site.description.clone(),
        site_author: config.site.author.clone(),
        nav_home: format!("{}index.html", base_url),
        nav_source: config.site.repository.clone().unwrap_or_default(),
        has_source: config.site.repository.is_some(),
        css_path: base_url.to_string(),
        items,
        nav_tree_html,
    };

    let html = template.render().context("Failed to render index template")?;
    fs::write(config.output_dir().join("index.html"), html)
        .context("Failed to write index.html")?;

    tracing::info!("Rendered index page");

    Ok(())
}

/// Group pages into a directory tree for the index navigation
fn build_nav_tree(nav_pages: &[&Page], base_url: &str) -> NavNode {
    let mut root = NavNode {
        name: String::new(),
        pages: Vec::new(),
        subdirs: Vec::new(),
    };

    for page in nav_pages {
        let parts: Vec<&str> = page.output_rel_path.split('/').collect();
        let entry = PageEntry::from_page(page, base_url);

        if parts.len() == 1 {
            root.pages.push(entry);
        } else {
            insert_into_tree(&mut root, &parts[..parts.len() - 1], entry);
        }
    }

    sort_tree(&mut root);
    root
}

/// Insert a page under its directory path, creating nodes as needed
fn insert_into_tree(node: &mut NavNode, dir_path: &[&str], entry: PageEntry) {
    if dir_path.is_empty() {
        node.pages.push(entry);
        return;
    }

    let name = dir_path[0];
    let idx = match node.subdirs.iter().position(|d| d.name == name) {
        Some(idx) => idx,
        None => {
            node.subdirs.push(NavNode {
                name: name.to_string(),
                pages: Vec::new(),
                subdirs: Vec::new(),
            });
            node.subdirs.len() - 1
        }
    };

    insert_into_tree(&mut node.subdirs[idx], &dir_path[1..], entry);
}

/// Sort subdirectories by name, recursively. Pages within a directory
/// keep the (weight, title) navigation order they were inserted in.
fn sort_tree(node: &mut NavNode) {
    node.subdirs.sort_by(|a, b| a.name.cmp(&b.name));
    for child in &mut node.subdirs {
        sort_tree(child);
    }
}

/// Render the 404 error page
fn render_404_page(config: &Config, base_url: &str) -> Result<()> {
    let template = NotFoundTemplate {
        site_title: config.site.title.clone(),
        site_author: config.site.author.clone(),
        nav_home: format!("{}index.html", base_url),
        nav_source: config.site.repository.clone().unwrap_or_default(),
        has_source: config.site.repository.is_some(),
        css_path: base_url.to_string(),
    };

    let html = template.render().context("Failed to render 404 template")?;

    let output_path = config.output_dir().join("404.html");
    fs::write(&output_path, html).context("Failed to write 404.html")?;

    tracing::info!("Rendered 404 page");

    Ok(())
}

/// Generate sitemap.xml. Last-modified dates come only from document
/// frontmatter, never from the clock, so output stays reproducible.
fn generate_sitemap(config: &Config, site: &Site, base_url: &str) -> Result<()> {
    let mut urls = String::new();

    if !site.has_root_index() {
        urls.push_str(&format!(
            "<url><loc>{}</loc></url>",
            escape_xml(&absolute_url(&config.site.url, base_url, "index.html"))
        ));
    }

    for page in &site.pages {
        let loc = absolute_url(&config.site.url, base_url, &page.output_rel_path);
        urls.push_str("<url>");
        urls.push_str(&format!("<loc>{}</loc>", escape_xml(&loc)));
        if let Some(date) = page.date {
            urls.push_str(&format!("<lastmod>{}</lastmod>", date.format("%Y-%m-%d")));
        }
        urls.push_str("</url>");
    }

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls
    );

    fs::write(config.output_dir().join("sitemap.xml"), xml)?;
    tracing::info!("Generated sitemap.xml");

    Ok(())
}

/// Copy the stylesheet bundle into the output
fn copy_static_assets(config: &Config) -> Result<()> {
    let output_dir = config.output_dir();

    // A local static/ directory wins during development; the embedded
    // copy covers installed binaries
    let static_dir = Path::new("static");
    if static_dir.exists() {
        fsops::copy_tree(static_dir, &output_dir).context("Failed to copy local static/")?;
        tracing::info!("Copied assets from local static/");
    } else {
        extract_embedded_static(&output_dir)?;
        tracing::info!("Copied assets from embedded static bundle");
    }

    // Custom theme directory overrides the defaults
    if let Some(theme_dir) = config.theme_dir() {
        if theme_dir.exists() {
            fsops::copy_tree(&theme_dir, &output_dir)
                .with_context(|| format!("Failed to copy theme from {:?}", theme_dir))?;
            tracing::info!("Copied custom theme from {:?}", theme_dir);
        } else {
            tracing::warn!("Configured theme path {:?} does not exist", theme_dir);
        }
    }

    Ok(())
}

fn extract_embedded_static(dest: &Path) -> Result<()> {
    for entry in STATIC_ASSETS.entries() {
        extract_entry(entry, dest)?;
    }
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            let target = dest.join(file.path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.contents())
                .with_context(|| format!("Failed to write embedded file to {:?}", target))?;
        }
    }
    Ok(())
}

/// Walk the freshly written output and record every file in the report
fn collect_report(output_dir: &Path) -> Result<BuildReport> {
    let mut files = Vec::new();

    for entry in WalkDir::new(output_dir)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == ".git"))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if let Ok(rel) = entry.path().strip_prefix(output_dir) {
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(rel);
        }
    }
    files.sort();

    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        files,
    })
}

fn absolute_url(site_url: &str, base_url: &str, rel: &str) -> String {
    let root = site_url.trim_end_matches('/');
    let base = base_url.trim_matches('/');
    let rel = rel.trim_start_matches('/');

    let mut url = String::from(root);
    if !base.is_empty() {
        url.push('/');
        url.push_str(base);
    }
    if !rel.is_empty() {
        url.push('/');
        url.push_str(rel);
    }
    url
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_joins_cleanly() {
        assert_eq!(
            absolute_url("https://docs.example.com/", "/", "guide/widgets.html"),
            "https://docs.example.com/guide/widgets.html"
        );
        assert_eq!(
            absolute_url("https://example.com", "/docs/", "index.html"),
            "https://example.com/docs/index.html"
        );
        assert_eq!(
            absolute_url("https://example.com", "/", ""),
            "https://example.com"
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b <c>"), "a &amp; b &lt;c&gt;");
    }

    #[test]
    fn test_nav_tree_groups_by_directory() {
        let pages = vec![
            Page {
                output_rel_path: "index.html".to_string(),
                source_path: "index.md".to_string(),
                title: "Home".to_string(),
                description: None,
                date: None,
                weight: 0,
                html: String::new(),
                toc_html: None,
            },
            Page {
                output_rel_path: "guide/widgets.html".to_string(),
                source_path: "guide/widgets.md".to_string(),
                title: "Widgets".to_string(),
                description: None,
                date: None,
                weight: 0,
                html: String::new(),
                toc_html: None,
            },
            Page {
                output_rel_path: "guide/advanced/theming.html".to_string(),
                source_path: "guide/advanced/theming.md".to_string(),
                title: "Theming".to_string(),
                description: None,
                date: None,
                weight: 0,
                html: String::new(),
                toc_html: None,
            },
        ];
        let refs: Vec<&Page> = pages.iter().collect();

        let root = build_nav_tree(&refs, "/");

        assert_eq!(root.pages.len(), 1);
        assert_eq!(root.pages[0].title, "Home");
        assert_eq!(root.subdirs.len(), 1);
        assert_eq!(root.subdirs[0].name, "guide");
        assert_eq!(root.subdirs[0].pages.len(), 1);
        assert_eq!(root.subdirs[0].subdirs[0].name, "advanced");
        assert_eq!(root.subdirs[0].subdirs[0].pages[0].title, "Theming");

        let html = root.render_to_html();
        assert!(html.contains("guide/"));
        assert!(html.contains("href=\"/guide/advanced/theming.html\""));
    }
}
