//! Directory entry handler: `d,<path>`

use std::fs;
use std::path::Path;

use super::ensure_inside_root;
use crate::context::BuildContext;
use crate::error::{IoResultExt, Result};

/// Create `root/path` and any missing ancestors. Existing directories are fine.
pub fn handle_dir(ctx: &BuildContext, path: &Path) -> Result<()> {
    let full_path = ctx.dst(path);
    ensure_inside_root(ctx, &full_path)?;
    fs::create_dir_all(&full_path).at(&full_path)?;
    Ok(())
}
