//! Shared test utilities for executor tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::context::BuildContext;
use crate::package::PlatformKind;
use crate::tree::Manifest;

/// Temporary source tree and package root.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Where manifest sources live
    pub source: PathBuf,
    /// Package root being materialized
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("source");
        let root = temp_dir.path().join("target/vsp-x86_64-unknown-linux-gnu");

        fs::create_dir_all(&source).expect("Failed to create source dir");
        fs::create_dir_all(&root).expect("Failed to create package root");

        Self {
            _temp_dir: temp_dir,
            source,
            root,
        }
    }

    /// Posix build context over `root`.
    pub fn build_context(&self) -> BuildContext {
        BuildContext::new(&self.root, PlatformKind::Posix)
    }

    /// Write a source file, creating parents. Returns its absolute path.
    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.source.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source parent");
        }
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Parse manifest text with sources resolved against `source`.
    pub fn manifest(&self, text: &str) -> Manifest {
        Manifest::parse(text)
            .expect("test manifest should parse")
            .resolve_sources(&self.source)
    }
}

/// Every path under `root`, relative, `/`-separated, sorted. Links are not followed.
pub fn list_tree(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|e| {
            let entry = e.expect("walk should succeed");
            entry
                .path()
                .strip_prefix(root)
                .expect("entry under root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

pub fn assert_dir_exists(path: &Path) {
    assert!(path.is_dir(), "Expected directory: {}", path.display());
}

pub fn assert_file_exists(path: &Path) {
    assert!(path.is_file(), "Expected file to exist: {}", path.display());
}

/// Assert that a symlink exists and points to the expected target.
pub fn assert_symlink(path: &Path, expected_target: &str) {
    assert!(
        path.is_symlink(),
        "Expected symlink at {}, but it's not a symlink",
        path.display()
    );

    let target = fs::read_link(path).expect("Failed to read symlink");
    assert_eq!(
        target.to_string_lossy(),
        expected_target,
        "Symlink {} points to {:?}, expected {}",
        path.display(),
        target,
        expected_target
    );
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}
