//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../galley.yml.example");
const DEFAULT_STYLESHEET: &str = include_str!("../../../static/css/galley.css");

/// Initialize a new galley project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_docs(root)?;
    write_stylesheet(root)?;

    println!("✓ galley initialized in {:?}", root);
    println!("  - Edit galley.yml to set site metadata and the publish target");
    println!("  - Write documents under docs/, then run `galley build`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("galley.yml");
    if config_path.exists() {
        println!("galley.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_docs(root: &Path) -> Result<()> {
    let docs = root.join("docs");
    let guide = docs.join("guide");

    for dir in [&docs, &guide] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let index = docs.join("index.md");
    if !index.exists() {
        fs::write(&index, sample_index())?;
        println!("Created {:?}", index);
    }

    let guide_doc = guide.join("getting-started.md");
    if !guide_doc.exists() {
        fs::write(&guide_doc, sample_guide())?;
        println!("Created {:?}", guide_doc);
    }

    Ok(())
}

// The scaffolded styles give `galley build` something to copy even
// before the user customizes anything
fn write_stylesheet(root: &Path) -> Result<()> {
    let css_dir = root.join("static").join("css");
    let css_path = css_dir.join("galley.css");
    if css_path.exists() {
        return Ok(());
    }

    fs::create_dir_all(&css_dir)
        .with_context(|| format!("Failed to create {:?}", css_dir))?;
    fs::write(&css_path, DEFAULT_STYLESHEET)
        .with_context(|| format!("Failed to write {:?}", css_path))?;
    println!("Created {:?}", css_path);
    Ok(())
}

fn sample_index() -> String {
    r#"---
title: Welcome
description: Start here
weight: -10
---

# Welcome

This site is built with galley. Every Markdown file under `docs/`
becomes one HTML page at the same relative path:

```text
docs/guide/getting-started.md  ->  guide/getting-started.html
```

See [Getting started](guide/getting-started.md) for the full tour.
"#
    .to_string()
}

fn sample_guide() -> String {
    r#"---
title: Getting started
description: Writing, building, and publishing
---

# Getting started

## Writing

Put Markdown files under `docs/`. Frontmatter is optional; when a
document has none, its first heading becomes the title.

## Building

```bash
galley build
galley serve
```

`build` renders the whole tree into `public/`; `serve` previews it
locally and rebuilds when a source file changes.

## Publishing

Set a publish target in `galley.yml`, then:

```bash
galley deploy
```
"#
    .to_string()
}
