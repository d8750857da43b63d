//! vsp-distro - release packager for the vsp toolchain.
//!
//! Builds the compiler, lays the release tree out from a manifest and
//! compresses it into a platform archive.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vsp_distro::config::Config;
use vsp_distro::package::Mode;

#[derive(Parser)]
#[command(name = "vsp-distro")]
#[command(about = "Package the vsp toolchain for release")]
#[command(
    after_help = "QUICK START:\n  vsp-distro preflight  Check the manifest and build tools\n  vsp-distro build      Build and package for this host\n  vsp-distro clean      Remove packages and archives"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the compiler and package it
    Build {
        #[command(flatten)]
        target: TargetArgs,

        /// File-tree manifest (default: resources/file-tree.csv)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Output directory (default: target)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Root that relative manifest sources resolve against
        #[arg(long)]
        source_root: Option<PathBuf>,

        /// Package the existing build without running the compiler build
        #[arg(long)]
        no_compile: bool,
    },

    /// Check the manifest, its sources and the build program
    Preflight {
        #[arg(long)]
        manifest: Option<PathBuf>,

        #[arg(long)]
        source_root: Option<PathBuf>,

        /// Skip the compiler build program check
        #[arg(long)]
        no_compile: bool,

        /// Exit non-zero if any check fails
        #[arg(long)]
        strict: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Extract a package archive for inspection
    Extract {
        /// Archive to unpack (.tar.gz or .zip)
        archive: PathBuf,

        /// Output directory (default: <output>/<archive stem>-extracted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove package directories, archives and checksums
    Clean {
        /// Remove the whole output directory
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show the parsed manifest
    Manifest {
        #[arg(long)]
        manifest: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Show the package that would be built
    Package {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        json: bool,
    },
}

/// Which package to build.
#[derive(Args, Clone)]
struct TargetArgs {
    /// Release mode recorded in the package name
    #[arg(long)]
    mode: Option<Mode>,

    /// Full target triplet, e.g. x86_64-unknown-linux-gnu (default: host)
    #[arg(long, conflicts_with_all = ["arch", "vendor", "os"])]
    target_triplet: Option<String>,

    #[arg(long, requires_all = ["vendor", "os"])]
    arch: Option<String>,

    #[arg(long, requires_all = ["arch", "os"])]
    vendor: Option<String>,

    #[arg(long, requires_all = ["arch", "vendor"])]
    os: Option<String>,
}

impl From<TargetArgs> for commands::Target {
    fn from(args: TargetArgs) -> Self {
        let triplet = match (args.target_triplet, args.arch, args.vendor, args.os) {
            (Some(triplet), ..) => commands::Triplet::Explicit(triplet),
            (None, Some(arch), Some(vendor), Some(os)) => {
                commands::Triplet::Parts { arch, vendor, os }
            }
            _ => commands::Triplet::Host,
        };
        Self {
            mode: args.mode,
            triplet,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let mut config = Config::load(&base_dir);

    match cli.command {
        Commands::Build {
            target,
            manifest,
            output,
            source_root,
            no_compile,
        } => {
            config.override_paths(&base_dir, manifest, output, source_root);
            commands::cmd_build(&config, target.into(), !no_compile)?;
        }

        Commands::Preflight {
            manifest,
            source_root,
            no_compile,
            strict,
        } => {
            config.override_paths(&base_dir, manifest, None, source_root);
            commands::cmd_preflight(&config, !no_compile, strict)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Manifest { manifest, json } => {
                    config.override_paths(&base_dir, manifest, None, None);
                    commands::show::ShowTarget::Manifest { json }
                }
                ShowTarget::Package { target, json } => commands::show::ShowTarget::Package {
                    target: target.into(),
                    json,
                },
            };
            commands::cmd_show(&config, show_target)?;
        }

        Commands::Extract { archive, output } => {
            commands::cmd_extract(&config, &archive, output)?;
        }

        Commands::Clean { all } => {
            commands::cmd_clean(&config, all)?;
        }
    }

    Ok(())
}
