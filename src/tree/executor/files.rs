//! File entry handlers: `f,<dst>,<src>` and `fx,<dst>,<src>`
//!
//! Copies keep permission bits and timestamps of the source. An existing
//! destination is replaced; a destination that is an existing directory
//! receives the source under its own file name.
//!
//! Links inside a copied directory stay links in Posix packages. Windows
//! packages get the linked content instead, since zip cannot carry links.

use filetime::FileTime;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::{create_symlink_if_missing, ensure_inside_root, ensure_parent_exists};
use crate::context::BuildContext;
use crate::error::{Error, IoResultExt, Result};
use crate::package::PlatformKind;

/// Handle `f`: copy a file, or a whole directory tree, into the package.
pub fn handle_file(ctx: &BuildContext, dst: &Path, src: &Path) -> Result<()> {
    let meta = source_metadata(src)?;
    let dst = ctx.dst(dst);

    if meta.is_dir() {
        ensure_inside_root(ctx, &dst)?;
        copy_tree(src, &dst, ctx.platform)
    } else {
        let target = into_existing_dir(&dst, src);
        ensure_parent_inside_root(ctx, &target)?;
        copy_file(src, &target, &meta)?;
        Ok(())
    }
}

/// Handle `fx`: copy a file and grant execute permission.
pub fn handle_executable(ctx: &BuildContext, dst: &Path, src: &Path) -> Result<()> {
    let meta = source_metadata(src)?;
    if meta.is_dir() {
        return Err(Error::io(
            src,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "executable entry source is a directory",
            ),
        ));
    }

    let target = into_existing_dir(&ctx.dst(dst), src);
    ensure_parent_inside_root(ctx, &target)?;
    copy_file(src, &target, &meta)?;
    set_executable(&target)
}

fn ensure_parent_inside_root(ctx: &BuildContext, path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => ensure_inside_root(ctx, parent),
        None => Ok(()),
    }
}

/// Metadata of a required input, mapping absence to `SourceNotFound`.
fn source_metadata(src: &Path) -> Result<Metadata> {
    fs::metadata(src).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound(src.to_path_buf()),
        _ => Error::io(src, e),
    })
}

fn into_existing_dir(dst: &Path, src: &Path) -> PathBuf {
    match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    }
}

/// Copy one regular file, preserving mode and timestamps. Returns `dst`.
fn copy_file(src: &Path, dst: &Path, meta: &Metadata) -> Result<PathBuf> {
    ensure_parent_exists(dst)?;
    remove_existing(dst)?;

    fs::copy(src, dst).at(dst)?;

    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_times(dst, atime, mtime).at(dst)?;

    debug!(src = %src.display(), dst = %dst.display(), "copied");
    Ok(dst.to_path_buf())
}

/// Remove a non-directory at `path` so a read-only file or a symlink left
/// by a previous run cannot redirect or block the copy.
fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(path).at(path),
        _ => Ok(()),
    }
}

/// Recursively copy `src` into `dst`, merging with existing directories.
fn copy_tree(src: &Path, dst: &Path, platform: PlatformKind) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::io(path, io::Error::from(e))
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else if file_type.is_symlink() {
            copy_link(entry.path(), &target, platform)?;
        } else {
            let meta = entry.metadata().map_err(|e| Error::io(entry.path(), io::Error::from(e)))?;
            copy_file(entry.path(), &target, &meta)?;
        }
    }
    Ok(())
}

/// Recreate the link at `link` for Posix; copy what it points to for Windows.
fn copy_link(link: &Path, target: &Path, platform: PlatformKind) -> Result<()> {
    if platform == PlatformKind::Posix {
        let link_target = fs::read_link(link).at(link)?;
        create_symlink_if_missing(target, &link_target)?;
        return Ok(());
    }

    // A dangling link has nothing to copy
    let meta = source_metadata(link)?;
    if meta.is_dir() {
        let resolved = link.canonicalize().at(link)?;
        if let Some(parent) = link.parent() {
            if parent.canonicalize().at(parent)?.starts_with(&resolved) {
                return Err(Error::io(
                    link,
                    io::Error::new(io::ErrorKind::InvalidInput, "link points at its own ancestor"),
                ));
            }
        }
        debug!(link = %link.display(), resolved = %resolved.display(), "copying linked directory");
        copy_tree(&resolved, target, platform)
    } else {
        copy_file(link, target, &meta)?;
        Ok(())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).at(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms).at(path)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    // Executability follows the file extension on non-Unix hosts
    Ok(())
}
