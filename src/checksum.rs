//! SHA256 sidecar files for produced archives.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};

/// Suffix appended to the archive path for its checksum file.
pub const CHECKSUM_SUFFIX: &str = ".sha256";

/// Hex SHA256 of a file's content, streamed.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).at(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).at(path)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write `<archive>.sha256` in `sha256sum` format. Returns its path.
pub fn write_checksum(archive: &Path) -> Result<PathBuf> {
    let digest = sha256_file(archive)?;
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut sidecar = archive.as_os_str().to_owned();
    sidecar.push(CHECKSUM_SUFFIX);
    let sidecar = PathBuf::from(sidecar);

    fs::write(&sidecar, format!("{}  {}\n", digest, file_name))
        .map_err(|e| Error::archive_write(&sidecar, e))?;
    Ok(sidecar)
}
