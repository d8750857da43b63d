//! Extract command - unpacks a package archive for inspection.

use anyhow::Result;
use std::path::{Path, PathBuf};

use vsp_distro::archive;
use vsp_distro::config::Config;

/// Execute the extract command.
pub fn cmd_extract(config: &Config, archive_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| {
        config
            .output
            .join(format!("{}-extracted", archive_stem(archive_path)))
    });

    println!("Extracting {} to {}...", archive_path.display(), output_dir.display());
    archive::extract(archive_path, &output_dir)?;
    println!("Extracted to: {}", output_dir.display());
    Ok(())
}

/// File name without its archive extension.
fn archive_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    [".tar.gz", ".tgz", ".zip"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(&name)
        .to_string()
}
