//! # galley-core
//!
//! Core library for the galley documentation site builder.
//!
//! This crate provides the build half of the pipeline (collecting markdown
//! sources, checking them, and rendering pages) and the publish half
//! (replacing a hosting directory or branch with built output).

pub mod builder;
pub mod check;
pub mod config;
pub mod frontmatter;
pub mod fsops;
pub mod markdown;
pub mod models;
pub mod publish;
pub mod slug;
pub mod source;

pub use builder::{BuildError, SiteBuilder};
pub use check::{check_documents, has_errors};
pub use config::{Config, ConfigError, PublishTarget};
pub use models::{
    BuildReport, Diagnostic, DiagnosticSeverity, Document, Frontmatter, Page, Site,
};
pub use publish::{publish_site, PublishError, PublishSummary};
pub use slug::slugify;
