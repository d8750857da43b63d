//! Build output cleaning.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{IoResultExt, Result};
use crate::package::PACKAGE_PREFIX;

/// Remove package roots, archives and checksums from `output`.
///
/// Only entries named `vsp-*` are touched; anything else in the output
/// directory is left alone. Returns the removed paths, sorted.
pub fn clean_packages(output: &Path) -> Result<Vec<PathBuf>> {
    if !output.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}-", PACKAGE_PREFIX);
    let mut removed = Vec::new();
    for entry in fs::read_dir(output).at(output)? {
        let entry = entry.at(output)?;
        if !entry.file_name().to_string_lossy().starts_with(&prefix) {
            continue;
        }

        let path = entry.path();
        if entry.file_type().at(&path)?.is_dir() {
            fs::remove_dir_all(&path).at(&path)?;
        } else {
            fs::remove_file(&path).at(&path)?;
        }
        info!(path = %path.display(), "removed");
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

/// Remove the whole output directory.
pub fn clean_all(output: &Path) -> Result<bool> {
    if !output.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(output).at(output)?;
    info!(path = %output.display(), "removed output directory");
    Ok(true)
}
