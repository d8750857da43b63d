//! Tree executor - interprets manifest entries against a package root.
//!
//! This module is organized into submodules by entry type:
//! - `directories` - `d` entries
//! - `files` - `f` and `fx` entries (metadata-preserving copies)
//! - `links` - `s` entries (skip-if-exists symlinks)
//! - `helpers` - Shared test utilities
//!
//! Entries run strictly in manifest order and the first failure aborts the
//! rest. Nothing already written is rolled back; the partial tree stays on
//! disk for inspection.

mod directories;
mod files;
mod links;

#[cfg(test)]
pub(crate) mod helpers;

pub use links::create_symlink_if_missing;

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::FileTreeEntry;
use crate::context::BuildContext;
use crate::error::{Error, IoResultExt, Result};

/// Materialize every entry under `ctx.root`, in order.
pub fn materialize(ctx: &BuildContext, entries: &[FileTreeEntry]) -> Result<()> {
    info!(
        root = %ctx.root.display(),
        entries = entries.len(),
        "materializing file tree"
    );

    for entry in entries {
        execute_entry(ctx, entry)?;
    }

    Ok(())
}

/// Execute a single entry by routing to the appropriate handler.
fn execute_entry(ctx: &BuildContext, entry: &FileTreeEntry) -> Result<()> {
    debug!(%entry, "applying entry");
    match entry {
        FileTreeEntry::Directory { path } => directories::handle_dir(ctx, path),
        FileTreeEntry::File { dst, src } => files::handle_file(ctx, dst, src),
        FileTreeEntry::ExecutableFile { dst, src } => files::handle_executable(ctx, dst, src),
        FileTreeEntry::Symlink { dst, target } => links::handle_symlink(ctx, dst, target),
    }
}

/// Refuse to write into `dir` when an existing link under the root leads
/// out of it (e.g. `s,etc,/etc` followed by `f,etc/x,...`).
fn ensure_inside_root(ctx: &BuildContext, dir: &Path) -> Result<()> {
    let Ok(root) = ctx.root.canonicalize() else {
        return Ok(());
    };

    let mut existing = dir;
    while !existing.exists() {
        match existing.parent() {
            Some(parent) => existing = parent,
            None => return Ok(()),
        }
    }
    // Ancestors of the root itself are not ours to judge
    if !existing.starts_with(&ctx.root) {
        return Ok(());
    }

    let resolved = existing.canonicalize().at(existing)?;
    if resolved.starts_with(&root) {
        Ok(())
    } else {
        Err(Error::OutsideRoot {
            path: dir.to_path_buf(),
            resolved,
        })
    }
}

/// Create all parent directories of `path`.
fn ensure_parent_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::helpers::*;
    use super::*;
    use crate::tree::Manifest;

    #[test]
    fn test_materialize_twice_is_idempotent() {
        let env = TestEnv::new();
        env.write_source("vsp", "#!/bin/sh\n");
        env.write_source("conf/env", "VSP_HOME=.\n");
        let ctx = env.build_context();
        let manifest = env.manifest("d,bin\nfx,bin/vsp,vsp\nd,conf\nf,conf/env,conf/env\ns,etc,conf\n");

        materialize(&ctx, manifest.entries()).expect("first run should succeed");
        let first = list_tree(&env.root);

        materialize(&ctx, manifest.entries()).expect("second run should succeed");
        let second = list_tree(&env.root);

        assert_eq!(first, second);
        assert_eq!(
            second,
            vec!["bin", "bin/vsp", "conf", "conf/env", "etc"]
        );
    }

    #[test]
    fn test_fail_fast_stops_at_missing_source() {
        let env = TestEnv::new();
        let ctx = env.build_context();
        let manifest = env.manifest("d,out\nf,out/a.txt,missing_src.txt\nd,out/sub\n");

        let err = materialize(&ctx, manifest.entries()).expect_err("missing source must fail");
        match err {
            Error::SourceNotFound(path) => assert!(path.ends_with("missing_src.txt")),
            other => panic!("expected SourceNotFound, got {:?}", other),
        }

        assert!(env.root.join("out").is_dir(), "first entry ran");
        assert!(!env.root.join("out/a.txt").exists());
        assert!(!env.root.join("out/sub").exists(), "third entry never ran");
    }

    #[test]
    fn test_entries_run_in_manifest_order() {
        let env = TestEnv::new();
        env.write_source("a", "first");
        env.write_source("b", "second");
        let ctx = env.build_context();
        // Same destination twice: the later copy wins
        let manifest = env.manifest("f,x,a\nf,x,b\n");

        materialize(&ctx, manifest.entries()).expect("materialize should succeed");
        assert_file_contains(&env.root.join("x"), "second");
    }

    #[test]
    fn test_empty_manifest_touches_nothing() {
        let env = TestEnv::new();
        let ctx = env.build_context();
        materialize(&ctx, Manifest::default().entries()).expect("empty manifest is fine");
        assert!(list_tree(&env.root).is_empty());
    }
}
