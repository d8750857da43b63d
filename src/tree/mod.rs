//! Declarative file-tree manifests.
//!
//! A manifest describes WHAT the package root looks like, one entry per
//! line. The executor then reproduces it on disk.
//!
//! ```text
//! Manifest (DATA)                   Executor (LOGIC)
//! ───────────────────────           ─────────────────
//! d,bin                             for entry in manifest {
//! fx,bin/vsp,target/debug/vsp         execute_entry(ctx, entry)?;
//! d,conf                            }
//! f,conf/env,resources/conf/env
//! s,etc,conf
//! ```
//!
//! Entries run in file order. A directory declared on line 1 exists before
//! the file copied into it on line 2.

pub mod executor;
pub mod parser;

pub use executor::materialize;
pub use parser::parse;

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, ParseError, Result};

/// One manifest line.
///
/// `dst` paths are relative to the package root being materialized.
/// `src` paths are relative to the source root until
/// [`Manifest::resolve_sources`] joins them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileTreeEntry {
    /// `d,<path>`: create a directory (and ancestors).
    Directory { path: PathBuf },
    /// `f,<dst>,<src>`: metadata-preserving copy.
    File { dst: PathBuf, src: PathBuf },
    /// `fx,<dst>,<src>`: copy, then make executable.
    ExecutableFile { dst: PathBuf, src: PathBuf },
    /// `s,<dst>,<target>`: symlink, skipped if `dst` already exists.
    Symlink { dst: PathBuf, target: PathBuf },
}

impl FileTreeEntry {
    /// Manifest type tag of this entry.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Directory { .. } => parser::TAG_DIRECTORY,
            Self::File { .. } => parser::TAG_FILE,
            Self::ExecutableFile { .. } => parser::TAG_EXECUTABLE,
            Self::Symlink { .. } => parser::TAG_SYMLINK,
        }
    }

    /// Path inside the package root this entry writes to.
    pub fn dst(&self) -> &Path {
        match self {
            Self::Directory { path } => path,
            Self::File { dst, .. } | Self::ExecutableFile { dst, .. } | Self::Symlink { dst, .. } => {
                dst
            }
        }
    }

    /// Input read from outside the package root, if any.
    pub fn src(&self) -> Option<&Path> {
        match self {
            Self::File { src, .. } | Self::ExecutableFile { src, .. } => Some(src),
            Self::Directory { .. } | Self::Symlink { .. } => None,
        }
    }
}

impl fmt::Display for FileTreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory { path } => write!(f, "{},{}", self.tag(), path.display()),
            Self::File { dst, src } | Self::ExecutableFile { dst, src } => {
                write!(f, "{},{},{}", self.tag(), dst.display(), src.display())
            }
            Self::Symlink { dst, target } => {
                write!(f, "{},{},{}", self.tag(), dst.display(), target.display())
            }
        }
    }
}

/// Ordered sequence of entries parsed from a manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<FileTreeEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<FileTreeEntry>) -> Self {
        Self { entries }
    }

    /// Parse manifest text. Pure; touches no files.
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        parser::parse(text).map(Self::new)
    }

    /// Read and parse a manifest file, resolving sources against `source_root`.
    pub fn load(path: &Path, source_root: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).at(path)?;
        let manifest = Self::parse(&text)?;
        Ok(manifest.resolve_sources(source_root))
    }

    /// Join every relative `src` onto `source_root`. Absolute sources and
    /// symlink targets are left as written.
    pub fn resolve_sources(mut self, source_root: &Path) -> Self {
        for entry in &mut self.entries {
            if let FileTreeEntry::File { src, .. } | FileTreeEntry::ExecutableFile { src, .. } =
                entry
            {
                if src.is_relative() {
                    *src = source_root.join(&*src);
                }
            }
        }
        self
    }

    pub fn entries(&self) -> &[FileTreeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileTreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All source paths the manifest reads, in entry order.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(FileTreeEntry::src)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a FileTreeEntry;
    type IntoIter = std::slice::Iter<'a, FileTreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
