//! Symlink entry handler: `s,<dst>,<target>`
//!
//! Unlike copies, links are never replaced. If anything already sits at
//! `dst` (a link, even a dangling one, or a regular file) the entry is a
//! no-op.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::{ensure_inside_root, ensure_parent_exists};
use crate::context::BuildContext;
use crate::error::{IoResultExt, Result};
use crate::package::PlatformKind;

/// Handle `s`: create `root/dst -> target` unless `dst` exists.
///
/// Windows packages carry no links, so the entry is skipped there.
pub fn handle_symlink(ctx: &BuildContext, dst: &Path, target: &Path) -> Result<()> {
    if ctx.platform == PlatformKind::Windows {
        warn!(
            link = %dst.display(),
            target = %target.display(),
            "skipping symlink for windows package"
        );
        return Ok(());
    }

    let link = ctx.dst(dst);
    if let Some(parent) = link.parent() {
        ensure_inside_root(ctx, parent)?;
    }
    create_symlink_if_missing(&link, target)?;
    Ok(())
}

/// Create `link -> target` if nothing exists at `link`.
///
/// Returns `true` if a link was created.
pub fn create_symlink_if_missing(link: &Path, target: &Path) -> Result<bool> {
    if fs::symlink_metadata(link).is_ok() {
        debug!(link = %link.display(), "already exists, leaving it alone");
        return Ok(false);
    }

    ensure_parent_exists(link)?;
    symlink(target, link).at(link)?;
    Ok(true)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
