//! Publishing: wholesale replacement of a hosting target with built output.
//!
//! Both targets share one contract: the previous published tree is replaced
//! entirely by the new one, and a publish that fails partway leaves the
//! target serving whatever it served before. There is no locking; when two
//! publishes race, the later one wins.

mod branch;

use crate::config::PublishTarget;
use crate::fsops;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output directory {0:?} does not exist; run a build first")]
    MissingOutput(PathBuf),

    #[error("output directory {0:?} is empty; refusing to publish")]
    EmptyOutput(PathBuf),

    #[error("publish destination {0:?} is the build output directory")]
    SelfTarget(PathBuf),

    #[error("authentication to '{remote}' failed: {detail}")]
    Auth { remote: String, detail: String },

    #[error("git {action} failed: {detail}")]
    Git { action: String, detail: String },
}

/// What a successful publish did
#[derive(Debug, Clone)]
pub struct PublishSummary {
    /// Number of files shipped to the target
    pub files: usize,

    /// Human-readable destination ("../live" or "origin (gh-pages)")
    pub destination: String,
}

/// Publish a built output directory to the configured target.
///
/// The output directory must exist and contain at least one file; an empty
/// or missing build is never pushed over live content.
pub fn publish_site(
    output_dir: &Path,
    target: &PublishTarget,
) -> Result<PublishSummary, PublishError> {
    if !output_dir.is_dir() {
        return Err(PublishError::MissingOutput(output_dir.to_path_buf()));
    }
    if !fsops::dir_has_files(output_dir)? {
        return Err(PublishError::EmptyOutput(output_dir.to_path_buf()));
    }

    match target {
        PublishTarget::Directory { path } => publish_directory(output_dir, path),
        PublishTarget::Branch { remote, branch } => {
            branch::publish_branch(output_dir, remote, branch)
        }
    }
}

/// Replace the contents of a destination directory with the output tree.
///
/// A `.git` entry at the destination root survives, so a checked-out hosting
/// directory keeps its history. Everything else from previous publishes is
/// removed before copying, so files deleted from the source disappear from
/// the target too.
fn publish_directory(output_dir: &Path, dest: &Path) -> Result<PublishSummary, PublishError> {
    if dest.exists() && same_file(output_dir, dest)? {
        return Err(PublishError::SelfTarget(dest.to_path_buf()));
    }

    fs::create_dir_all(dest)?;
    fsops::clear_dir(dest, &[".git"])?;
    let files = fsops::copy_tree(output_dir, dest)?;

    tracing::info!("Published {} files to {:?}", files, dest);

    Ok(PublishSummary {
        files,
        destination: dest.display().to_string(),
    })
}

fn same_file(a: &Path, b: &Path) -> std::io::Result<bool> {
    Ok(a.canonicalize()? == b.canonicalize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishTarget;

    fn dir_target(path: &Path) -> PublishTarget {
        PublishTarget::Directory {
            path: path.to_path_buf(),
        }
    }

    #[test]
    fn test_missing_output_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = publish_site(&tmp.path().join("public"), &dir_target(&tmp.path().join("live")))
            .unwrap_err();
        assert!(matches!(err, PublishError::MissingOutput(_)));
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("public");
        fs::create_dir_all(&output).unwrap();

        let err = publish_site(&output, &dir_target(&tmp.path().join("live"))).unwrap_err();
        assert!(matches!(err, PublishError::EmptyOutput(_)));
    }

    #[test]
    fn test_publish_into_itself_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("public");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("index.html"), "index").unwrap();

        let err = publish_site(&output, &dir_target(&output)).unwrap_err();
        assert!(matches!(err, PublishError::SelfTarget(_)));
    }

    #[test]
    fn test_directory_publish_replaces_wholesale() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("public");
        let live = tmp.path().join("live");
        fs::create_dir_all(&output).unwrap();

        // First publish: two pages
        fs::write(output.join("index.html"), "v1 index").unwrap();
        fs::write(output.join("old.html"), "v1 old").unwrap();
        let summary = publish_site(&output, &dir_target(&live)).unwrap();
        assert_eq!(summary.files, 2);

        // Second publish: old.html removed, new.html added
        fs::remove_file(output.join("old.html")).unwrap();
        fs::write(output.join("index.html"), "v2 index").unwrap();
        fs::write(output.join("new.html"), "v2 new").unwrap();
        publish_site(&output, &dir_target(&live)).unwrap();

        assert_eq!(fs::read_to_string(live.join("index.html")).unwrap(), "v2 index");
        assert_eq!(fs::read_to_string(live.join("new.html")).unwrap(), "v2 new");
        assert!(!live.join("old.html").exists());
    }

    #[test]
    fn test_republish_identical_tree_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("public");
        let live = tmp.path().join("live");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("index.html"), "stable").unwrap();

        publish_site(&output, &dir_target(&live)).unwrap();
        let summary = publish_site(&output, &dir_target(&live)).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(fs::read_to_string(live.join("index.html")).unwrap(), "stable");
    }

    #[test]
    fn test_directory_publish_keeps_target_checkout() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("public");
        let live = tmp.path().join("live");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("index.html"), "index").unwrap();
        fs::create_dir_all(live.join(".git")).unwrap();
        fs::write(live.join(".git/HEAD"), "ref: refs/heads/gh-pages").unwrap();

        publish_site(&output, &dir_target(&live)).unwrap();
        assert!(live.join(".git/HEAD").exists());
        assert!(live.join("index.html").exists());
    }
}
