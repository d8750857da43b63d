//! Clean command - removes packages and archives.

use anyhow::Result;

use vsp_distro::clean;
use vsp_distro::config::Config;

/// Execute the clean command.
pub fn cmd_clean(config: &Config, all: bool) -> Result<()> {
    if all {
        if clean::clean_all(&config.output)? {
            println!("Removed {}.", config.output.display());
        } else {
            println!("Nothing to clean.");
        }
        return Ok(());
    }

    let removed = clean::clean_packages(&config.output)?;
    if removed.is_empty() {
        println!("No packages to clean.");
    } else {
        for path in &removed {
            println!("Removed {}", path.display());
        }
        println!("Clean complete ({} removed).", removed.len());
    }
    Ok(())
}
