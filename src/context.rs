//! Build context shared by the tree executor.

use std::path::{Path, PathBuf};

use crate::package::{PackageDescriptor, PlatformKind};

/// Where entries are materialized and for which platform.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Package root; every `dst` is joined onto it
    pub root: PathBuf,
    /// Target platform, resolved once from the descriptor
    pub platform: PlatformKind,
}

impl BuildContext {
    pub fn new(root: impl Into<PathBuf>, platform: PlatformKind) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Context for materializing `descriptor`'s package root.
    pub fn for_package(descriptor: &PackageDescriptor) -> Self {
        Self::new(descriptor.root(), descriptor.platform())
    }

    /// Absolute path of a root-relative destination.
    pub fn dst(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }
}
