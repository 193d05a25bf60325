//! CI setup command: GitHub Actions workflow for GitHub Pages.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// Deploys on push to main, and only then: no schedules, no manual
// dispatch. Auth comes from the runner's own token, never the repo.
const WORKFLOW_TEMPLATE: &str = r#"name: Deploy docs

on:
  push:
    branches: [main]

permissions:
  contents: read
  pages: write
  id-token: write

concurrency:
  group: "pages"
  cancel-in-progress: false

jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - name: Checkout
        uses: actions/checkout@v4

      - name: Install galley
        run: |
          curl -sL https://github.com/galley-sh/galley/releases/latest/download/galley-linux-x86_64.tar.gz | tar xz
          chmod +x galley
          sudo mv galley /usr/local/bin/

      - name: Update base_url for GitHub Pages
        run: |
          sed -i 's|base_url: "/"|base_url: "/{repo_name}/"|g' galley.yml
          grep base_url galley.yml

      - name: Build site
        run: galley build

      - name: Upload artifact
        uses: actions/upload-pages-artifact@v3
        with:
          path: ./public

  deploy:
    environment:
      name: github-pages
      url: ${{ steps.deployment.outputs.page_url }}
    runs-on: ubuntu-latest
    needs: build
    steps:
      - name: Deploy to GitHub Pages
        id: deployment
        uses: actions/deploy-pages@v4
"#;

/// Write a GitHub Actions workflow that builds and publishes the site
/// on every push to the main branch.
pub fn setup_ci(repo: Option<&str>, force: bool) -> Result<()> {
    let workflows_dir = Path::new(".github/workflows");
    let workflow_path = workflows_dir.join("deploy-docs.yml");

    if workflow_path.exists() && !force {
        anyhow::bail!(
            "Workflow already exists at {:?}\nUse --force to overwrite",
            workflow_path
        );
    }

    let full_repo = match repo {
        Some(r) => r.to_string(),
        None => detect_github_repo()?,
    };

    // The project page is served under /<repo>/, so base_url needs the
    // bare repository name
    let repo_name = full_repo.split('/').nth(1).unwrap_or(&full_repo);

    fs::create_dir_all(workflows_dir).context("Failed to create .github/workflows directory")?;

    let workflow_content = WORKFLOW_TEMPLATE.replace("{repo_name}", repo_name);
    fs::write(&workflow_path, workflow_content)
        .with_context(|| format!("Failed to write workflow to {:?}", workflow_path))?;

    println!("✓ Created workflow at {}", workflow_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Commit and push the workflow:");
    println!("     git add .github/workflows/deploy-docs.yml");
    println!("     git commit -m \"Add docs deployment\"");
    println!("     git push");
    println!();
    println!("  2. Enable GitHub Pages in the repository settings:");
    println!("     https://github.com/{}/settings/pages (Source: GitHub Actions)", full_repo);
    println!();
    println!("  3. Push to main to trigger the first deployment");

    Ok(())
}

fn detect_github_repo() -> Result<String> {
    use std::process::Command;

    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .context("Failed to run git - is this a git repository?")?;

    if !output.status.success() {
        anyhow::bail!("No git remote 'origin' found. Use --repo to specify the repository");
    }

    let url = String::from_utf8(output.stdout)
        .context("Invalid UTF-8 in git remote URL")?
        .trim()
        .to_string();

    parse_github_repo(&url)
        .with_context(|| format!("Could not parse a GitHub repository from remote URL: {}", url))
}

/// Pull "user/repo" out of the HTTPS and SSH remote URL forms
fn parse_github_repo(url: &str) -> Option<String> {
    let clean = url.trim_end_matches(".git");

    if let Some(rest) = clean.strip_prefix("https://github.com/") {
        return Some(rest.to_string());
    }
    if let Some(rest) = clean.strip_prefix("git@github.com:") {
        return Some(rest.to_string());
    }

    None
}
