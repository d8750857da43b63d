//! Package identity: name, root directory and target platform.
//!
//! A [`PackageDescriptor`] is computed once per run and passed by value to
//! every stage, so the package name cannot change mid-build even if host
//! detection would answer differently later.

pub mod builder;
pub mod triplet;

pub use builder::{package, package_with, PackageOptions, PackagingError, Stage};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Fixed first component of every package name.
pub const PACKAGE_PREFIX: &str = "vsp";

/// Release flavour, recorded in the package name when given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Compiler, configuration and legal files.
    Complete,
    /// Compiler only.
    Compact,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(Self::Complete),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "unknown mode '{}' (expected 'complete' or 'compact')",
                other
            )),
        }
    }
}

/// Archive encoding and link policy for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// `.tar.gz`, symlinks kept.
    Posix,
    /// `.zip`, symlink entries skipped.
    Windows,
}

impl PlatformKind {
    /// Classify a `<cpu>-<vendor>-<os>[-abi]` triplet by its OS part.
    pub fn from_triplet(triplet: &str) -> Self {
        if triplet
            .split('-')
            .skip(1)
            .any(|part| part.starts_with("windows"))
        {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// File extension of the archive produced for this platform.
    pub fn archive_extension(self) -> &'static str {
        match self {
            Self::Posix => "tar.gz",
            Self::Windows => "zip",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => f.write_str("posix"),
            Self::Windows => f.write_str("windows"),
        }
    }
}

/// Name, root and platform of the package being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    name: String,
    root: PathBuf,
    triplet: String,
    mode: Option<Mode>,
    platform: PlatformKind,
}

impl PackageDescriptor {
    /// Build a descriptor rooted at `<output_base>/<name>`.
    ///
    /// The name joins [`PACKAGE_PREFIX`], the optional mode and the triplet
    /// with `-`.
    pub fn new(output_base: &Path, mode: Option<Mode>, triplet: impl Into<String>) -> Self {
        let triplet = triplet.into();
        let name = package_name(mode, &triplet);
        Self {
            root: output_base.join(&name),
            platform: PlatformKind::from_triplet(&triplet),
            name,
            triplet,
            mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn triplet(&self) -> &str {
        &self.triplet
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Directory the package root and its archive live in.
    pub fn output_base(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    /// Where the archive for this package will be written.
    pub fn archive_path(&self) -> PathBuf {
        self.output_base().join(format!(
            "{}.{}",
            self.name,
            self.platform.archive_extension()
        ))
    }
}

fn package_name(mode: Option<Mode>, triplet: &str) -> String {
    let mut parts = vec![PACKAGE_PREFIX];
    if let Some(mode) = mode {
        parts.push(mode.as_str());
    }
    parts.push(triplet);
    parts.join("-")
}
