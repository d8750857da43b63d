//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Build the compiler and package it
//! - `clean` - Remove packages and archives
//! - `show` - Display configuration, manifest or package
//! - `extract` - Unpack an archive for inspection
//! - `preflight` - Run preflight checks

pub mod build;
pub mod clean;
pub mod extract;
mod preflight;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use extract::cmd_extract;
pub use preflight::cmd_preflight;
pub use show::cmd_show;

use anyhow::Result;

use vsp_distro::config::Config;
use vsp_distro::package::{triplet, Mode, PackageDescriptor};

/// How the target triplet is chosen.
#[derive(Clone)]
pub enum Triplet {
    /// Detect from the running host
    Host,
    Explicit(String),
    Parts {
        arch: String,
        vendor: String,
        os: String,
    },
}

/// Package selection from the command line.
#[derive(Clone)]
pub struct Target {
    pub mode: Option<Mode>,
    pub triplet: Triplet,
}

impl Target {
    /// Resolve the descriptor once; every later stage receives this value.
    pub fn descriptor(self, config: &Config) -> Result<PackageDescriptor> {
        let triplet = match self.triplet {
            Triplet::Host => triplet::host()?,
            Triplet::Explicit(triplet) => triplet,
            Triplet::Parts { arch, vendor, os } => triplet::from_parts(&arch, &vendor, &os),
        };
        Ok(PackageDescriptor::new(&config.output, self.mode, triplet))
    }
}
