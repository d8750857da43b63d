//! Shared test utilities for vsp-distro tests.
#![allow(dead_code)]

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use vsp_distro::context::BuildContext;
use vsp_distro::package::PlatformKind;

/// Test environment: a mock source checkout and an output directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Mock repository checkout (manifest sources resolve here)
    pub source: PathBuf,
    /// Output base (package roots and archives land here)
    pub output: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("repo");
        let output = temp_dir.path().join("out");

        fs::create_dir_all(&source).expect("Failed to create source dir");
        fs::create_dir_all(&output).expect("Failed to create output dir");

        Self {
            _temp_dir: temp_dir,
            source,
            output,
        }
    }

    /// Build context for a Posix package root named `name`.
    pub fn build_context(&self, name: &str) -> BuildContext {
        BuildContext::new(self.output.join(name), PlatformKind::Posix)
    }

    /// Write a source file relative to the mock checkout.
    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.source.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source parent");
        }
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Write a manifest into the checkout and return its path.
    pub fn write_manifest(&self, text: &str) -> PathBuf {
        self.write_source("resources/file-tree.csv", text)
    }
}

/// Lay out what a finished compiler build leaves behind.
pub fn create_mock_release_sources(env: &TestEnv) {
    let compiler = env.write_source("src/compiler/target/debug/vsp", "#!/bin/sh\necho vsp\n");
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&compiler).expect("Failed to get metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&compiler, perms).expect("Failed to set permissions");
    }
    #[cfg(not(unix))]
    let _ = compiler;

    env.write_source("resources/conf/env.yml", "home: .\n");
    env.write_source("resources/conf/profiles/release.yml", "opt: 3\n");
    env.write_source("LICENSE-MIT", "MIT License\n");
    env.write_source("LICENSE-APACHE", "Apache License 2.0\n");
}

/// Manifest matching [`create_mock_release_sources`].
pub const RELEASE_MANIFEST: &str = "\
# vsp release layout
d,bin
fx,bin/vsp,src/compiler/target/debug/vsp

d,conf
f,conf/env.yml,resources/conf/env.yml
f,conf/profiles,resources/conf/profiles
s,etc,conf

d,legal
f,legal/LICENSE-MIT,LICENSE-MIT
f,legal/LICENSE-APACHE,LICENSE-APACHE
";

/// Relative paths of everything under `root`, `/`-separated and sorted.
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.expect("Failed to walk tree"))
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .expect("walk stays under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}

/// Relative path and bytes of every regular file under `root`, sorted.
pub fn file_contents(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = WalkDir::new(root)
        .into_iter()
        .map(|e| e.expect("Failed to walk tree"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .expect("walk stays under root")
                .to_string_lossy()
                .replace('\\', "/");
            (rel, fs::read(e.path()).expect("Failed to read file"))
        })
        .collect();
    files.sort();
    files
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

/// Assert that a file is executable by owner, group and others.
#[cfg(unix)]
pub fn assert_executable(path: &Path) {
    let mode = fs::metadata(path)
        .unwrap_or_else(|e| panic!("Failed to stat {}: {}", path.display(), e))
        .permissions()
        .mode();
    assert_eq!(
        mode & 0o111,
        0o111,
        "Expected {} to be executable, mode is {:o}",
        path.display(),
        mode
    );
}

/// Mode bits of `path` without the file type.
#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    fs::metadata(path)
        .unwrap_or_else(|e| panic!("Failed to stat {}: {}", path.display(), e))
        .permissions()
        .mode()
        & 0o777
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(
        path.is_dir(),
        "Expected directory to exist: {}",
        path.display()
    );
}
