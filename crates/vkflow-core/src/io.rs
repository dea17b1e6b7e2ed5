//! Filesystem helpers for the files vkflow writes into a project.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents`, staging them in a sibling tempfile so a
/// reader never sees a truncated helper file. Parent directories are created.
pub fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(contents)?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `contents` to `path` unless it already exists and `overwrite` is
/// off. Returns whether anything was written.
pub fn write_file(path: &Path, contents: &[u8], overwrite: bool) -> Result<bool> {
    if !overwrite && path.exists() {
        tracing::debug!(path = %path.display(), "keeping existing file");
        return Ok(false);
    }
    replace_file(path, contents)?;
    Ok(true)
}

pub fn read_text(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
