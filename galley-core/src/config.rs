//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Main configuration struct matching the galley.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub paths: PathsConfig,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    #[serde(default = "default_true")]
    pub enable_sitemap: bool,

    #[serde(default)]
    pub publish: Option<PublishConfig>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    String::from("/")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    pub description: String,

    /// Public URL the site is served at, used for absolute links
    pub url: String,

    /// Source repository URL, linked from the page header when set
    #[serde(default)]
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub output: PathBuf,

    #[serde(default)]
    pub theme: Option<PathBuf>,
}

/// Publish section of galley.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub target: PublishKind,

    /// Destination directory for the "dir" target
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Branch name for the "branch" target
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Git remote name or URL for the "branch" target
    #[serde(default = "default_remote")]
    pub remote: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishKind {
    Dir,
    #[default]
    Branch,
}

fn default_branch() -> String {
    String::from("gh-pages")
}

fn default_remote() -> String {
    String::from("origin")
}

/// Resolved publish destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    Directory { path: PathBuf },
    Branch { remote: String, branch: String },
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the source directory, resolved relative to the config file
    pub fn source_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.source)
    }

    /// Get the output directory, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Get the theme directory (None means use built-in assets only)
    pub fn theme_dir(&self) -> Option<PathBuf> {
        self.paths.theme.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve the publish section into a concrete target.
    ///
    /// A missing section, or a "dir" target without a path, is a
    /// configuration error surfaced before any pipeline step runs.
    pub fn publish_target(&self) -> Result<PublishTarget, ConfigError> {
        let publish = self
            .publish
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("publish".to_string()))?;

        match publish.target {
            PublishKind::Dir => {
                let path = publish
                    .path
                    .as_ref()
                    .ok_or_else(|| ConfigError::MissingField("publish.path".to_string()))?;
                Ok(PublishTarget::Directory {
                    path: self.resolve_path(path),
                })
            }
            PublishKind::Branch => Ok(PublishTarget::Branch {
                remote: publish.remote.clone(),
                branch: publish.branch.clone(),
            }),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }

    /// Normalized base URL with leading and trailing slash ("/docs/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    if raw.is_empty() {
        return "/".to_string();
    }

    let mut s = raw.trim().to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    // Collapse duplicate slashes (but keep leading)
    while s.contains("//") {
        s = s.replace("//", "/");
        if !s.starts_with('/') {
            s.insert(0, '/');
        }
    }

    if s.is_empty() {
        "/".to_string()
    } else {
        s
    }
}
