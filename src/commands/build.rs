//! Build command - builds the compiler and packages it.

use anyhow::Result;
use std::time::Instant;

use vsp_distro::archive::ArchiveOptions;
use vsp_distro::compiler;
use vsp_distro::config::Config;
use vsp_distro::package::{self, PackageOptions};
use vsp_distro::timing::format_duration;

use super::Target;

/// Execute the build command.
pub fn cmd_build(config: &Config, target: Target, compile: bool) -> Result<()> {
    let start = Instant::now();
    // Resolved before the compiler build so an unsupported host fails fast
    let descriptor = target.descriptor(config)?;

    if compile {
        println!("Building compiler in {}...", config.compiler_dir.display());
        compiler::build(config)?;
    }

    println!("Packaging {}...", descriptor.name());
    let options = PackageOptions {
        archive: ArchiveOptions {
            mtime: config.source_date_epoch,
        },
        checksum: true,
    };
    let archive = package::package_with(
        &descriptor,
        &config.manifest,
        &config.source_root,
        options,
    )?;

    println!(
        "\n=== Package complete ({}) ===",
        format_duration(start.elapsed())
    );
    println!("  {}", archive.display());
    Ok(())
}
