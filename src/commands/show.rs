//! Show command - displays information.

use anyhow::Result;

use vsp_distro::config::Config;
use vsp_distro::tree::Manifest;

use super::Target;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show the parsed manifest
    Manifest { json: bool },
    /// Show the package descriptor
    Package { target: Target, json: bool },
}

/// Execute the show command.
pub fn cmd_show(config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
        }
        ShowTarget::Manifest { json } => {
            let manifest = Manifest::load(&config.manifest, &config.source_root)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                println!("# {} ({} entries)", config.manifest.display(), manifest.len());
                for entry in &manifest {
                    println!("{}", entry);
                }
            }
        }
        ShowTarget::Package { target, json } => {
            let descriptor = target.descriptor(config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            } else {
                println!("Package:  {}", descriptor.name());
                println!("Triplet:  {}", descriptor.triplet());
                if let Some(mode) = descriptor.mode() {
                    println!("Mode:     {}", mode);
                }
                println!("Platform: {}", descriptor.platform());
                println!("Root:     {}", descriptor.root().display());
                println!("Archive:  {}", descriptor.archive_path().display());
            }
        }
    }
    Ok(())
}
