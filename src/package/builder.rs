//! Packaging orchestrator - runs the stages of one package build in order.
//!
//! ```text
//! Init → DirectoryCreated → TreeMaterialized → Archived → Done
//! ```
//!
//! There is no branching back. The first failing step ends the run with a
//! [`PackagingError`] naming the stage it started from. A partially
//! materialized tree is left on disk for inspection; a partial archive never
//! is (the archiver removes it).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::PackageDescriptor;
use crate::archive::{self, ArchiveOptions};
use crate::checksum;
use crate::context::BuildContext;
use crate::error::{Error, IoResultExt, Result};
use crate::timing::Timer;
use crate::tree::{self, Manifest};

/// Position of a build in the packaging state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    DirectoryCreated,
    TreeMaterialized,
    Archived,
    Done,
}

impl Stage {
    /// What the build does to leave this stage.
    pub fn step(self) -> &'static str {
        match self {
            Self::Init => "reading manifest and creating package directory",
            Self::DirectoryCreated => "materializing file tree",
            Self::TreeMaterialized => "archiving package",
            Self::Archived => "writing checksum",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::DirectoryCreated => "directory-created",
            Self::TreeMaterialized => "tree-materialized",
            Self::Archived => "archived",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a packaging run.
#[derive(Error, Debug)]
#[error("{} failed: {source}", stage.step())]
pub struct PackagingError {
    /// Stage the failing step started from
    pub stage: Stage,
    #[source]
    pub source: Error,
}

/// Options for one packaging run.
#[derive(Debug, Clone, Copy)]
pub struct PackageOptions {
    pub archive: ArchiveOptions,
    /// Write `<archive>.sha256` after archiving
    pub checksum: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            archive: ArchiveOptions::default(),
            checksum: true,
        }
    }
}

/// Build the package described by `descriptor` from `manifest_path`.
///
/// Relative manifest sources resolve against `source_root`. Returns the
/// archive path.
pub fn package(
    descriptor: &PackageDescriptor,
    manifest_path: &Path,
    source_root: &Path,
) -> std::result::Result<PathBuf, PackagingError> {
    package_with(
        descriptor,
        manifest_path,
        source_root,
        PackageOptions::default(),
    )
}

/// [`package`] with explicit options.
pub fn package_with(
    descriptor: &PackageDescriptor,
    manifest_path: &Path,
    source_root: &Path,
    options: PackageOptions,
) -> std::result::Result<PathBuf, PackagingError> {
    info!(
        package = descriptor.name(),
        root = %descriptor.root().display(),
        platform = %descriptor.platform(),
        "packaging"
    );
    let mut run = StateMachine::new();

    // The manifest is parsed before anything is written, so a bad one has
    // no effect on disk
    let manifest = run.advance(Stage::DirectoryCreated, || {
        let manifest = Manifest::load(manifest_path, source_root)?;
        fs::create_dir_all(descriptor.root()).at(descriptor.root())?;
        Ok(manifest)
    })?;

    run.advance(Stage::TreeMaterialized, || {
        let ctx = BuildContext::for_package(descriptor);
        tree::materialize(&ctx, manifest.entries())
    })?;

    let archive_path = run.advance(Stage::Archived, || {
        archive::archive_with(
            descriptor.platform(),
            descriptor.root(),
            descriptor.name(),
            descriptor.output_base(),
            options.archive,
        )
    })?;

    run.advance(Stage::Done, || {
        if options.checksum {
            let sidecar = checksum::write_checksum(&archive_path)?;
            debug!(checksum = %sidecar.display(), "checksum written");
        }
        Ok(())
    })?;

    info!(archive = %archive_path.display(), "package complete");
    Ok(archive_path)
}

struct StateMachine {
    stage: Stage,
}

impl StateMachine {
    fn new() -> Self {
        Self { stage: Stage::Init }
    }

    /// Run the step out of the current stage; move to `next` on success.
    fn advance<T>(
        &mut self,
        next: Stage,
        step: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, PackagingError> {
        let timer = Timer::start(self.stage.step());
        let value = step().map_err(|source| PackagingError {
            stage: self.stage,
            source,
        })?;
        timer.finish();

        debug!(from = %self.stage, to = %next, "stage complete");
        self.stage = next;
        Ok(value)
    }
}
