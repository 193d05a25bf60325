//! # galley-render
//!
//! Template rendering library for galley.
//!
//! This crate handles HTML template rendering using Askama.

pub mod templates;

pub use templates::{IndexTemplate, NavNode, NotFoundTemplate, PageEntry, PageTemplate};
