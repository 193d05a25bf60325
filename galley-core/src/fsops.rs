//! Filesystem tree operations shared by output writing and publishing.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Copy every file under `src` into `dest`, preserving the tree shape.
///
/// A top-level `.git` directory in `src` is never copied; a version-control
/// checkout sitting at the source root is not site content. Returns the
/// number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> io::Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == ".git"))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }

    Ok(copied)
}

/// Remove every top-level entry of `dir` except those named in `preserve`.
///
/// Used for wholesale replacement: the directory itself survives (and with
/// it anything a host cares about, like a `.git` checkout), but all previous
/// content goes.
pub fn clear_dir(dir: &Path, preserve: &[&str]) -> io::Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if preserve.iter().any(|p| name == *p) {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}

/// Whether `dir` contains at least one file, ignoring a top-level `.git`
pub fn dir_has_files(dir: &Path) -> io::Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == ".git"))
    {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            return Ok(true);
        }
    }

    Ok(false)
}
