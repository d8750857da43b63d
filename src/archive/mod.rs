//! Archive production, listing and extraction.
//!
//! Both encodings root every member at `basename(source_dir)`, so a package
//! extracts to the same `<package_name>/...` layout whichever one was used:
//!
//! ```text
//! target/vsp-x86_64-unknown-linux-gnu/bin/vsp
//!        └──────────── member ───────────┘
//! ```
//!
//! The archive is written to a temporary file next to its final path and
//! only renamed into place once complete, so a failed write never leaves a
//! truncated archive behind.

mod tarball;
mod zipfile;

use serde::Serialize;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::package::PlatformKind;

/// Encoding of an archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArchiveFormat {
    /// gzip-compressed tar
    TarGz,
    /// DEFLATE zip
    Zip,
}

impl ArchiveFormat {
    pub fn for_platform(platform: PlatformKind) -> Self {
        match platform {
            PlatformKind::Posix => Self::TarGz,
            PlatformKind::Windows => Self::Zip,
        }
    }

    /// Guess the encoding from a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// Mode of a finished archive on Unix hosts.
pub const ARCHIVE_MODE: u32 = 0o644;

/// Knobs that affect archive bytes but not layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions {
    /// Fixed mtime (seconds since epoch) for every member, e.g. from
    /// `SOURCE_DATE_EPOCH`. `None` keeps on-disk timestamps.
    pub mtime: Option<u64>,
}

/// Archive `source_dir` as `working_dir/<archive_name>.{tar.gz|zip}`.
pub fn archive(
    platform: PlatformKind,
    source_dir: &Path,
    archive_name: &str,
    working_dir: &Path,
) -> Result<PathBuf> {
    archive_with(
        platform,
        source_dir,
        archive_name,
        working_dir,
        ArchiveOptions::default(),
    )
}

/// [`archive`] with explicit options.
pub fn archive_with(
    platform: PlatformKind,
    source_dir: &Path,
    archive_name: &str,
    working_dir: &Path,
    options: ArchiveOptions,
) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound(source_dir.to_path_buf()));
    }

    let format = ArchiveFormat::for_platform(platform);
    let output = working_dir.join(format!("{}.{}", archive_name, format.extension()));
    let members = collect_members(source_dir)?;

    let partial = tempfile::Builder::new()
        .prefix(&format!(".{}.", archive_name))
        .suffix(".partial")
        .tempfile_in(working_dir)
        .map_err(|e| Error::archive_write(&output, e))?;

    let written = match format {
        ArchiveFormat::TarGz => tarball::write(partial.as_file(), &members, options),
        ArchiveFormat::Zip => zipfile::write(partial.as_file(), &members, options),
    };
    // Dropping `partial` on error deletes it
    written.map_err(|e| Error::archive_write(&output, e))?;
    set_release_permissions(partial.as_file()).map_err(|e| Error::archive_write(&output, e))?;

    partial
        .persist(&output)
        .map_err(|e| Error::archive_write(&output, e.error))?;

    info!(
        archive = %output.display(),
        members = members.len(),
        "archive written"
    );
    Ok(output)
}

/// Temp files are created owner-only; a release archive is world-readable.
#[cfg(unix)]
fn set_release_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(ARCHIVE_MODE))
}

#[cfg(not(unix))]
fn set_release_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

/// Member paths of an archive, `/`-separated, without trailing slashes, sorted.
pub fn list(archive: &Path) -> Result<Vec<String>> {
    let format = detect(archive)?;
    let mut names = match format {
        ArchiveFormat::TarGz => tarball::list(archive),
        ArchiveFormat::Zip => zipfile::list(archive),
    }
    .at(archive)?;

    for name in &mut names {
        while name.ends_with('/') {
            name.pop();
        }
    }
    names.sort();
    Ok(names)
}

/// Unpack an archive into `dest`.
///
/// Only the top-level entries the archive produces (normally the single
/// package directory) are replaced; anything else in `dest` is kept.
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let format = detect(archive)?;

    for top in top_level_members(&list(archive)?) {
        let previous = dest.join(&top);
        match fs::symlink_metadata(&previous) {
            Ok(meta) if meta.is_dir() => {
                info!(path = %previous.display(), "removing previous extraction");
                fs::remove_dir_all(&previous).at(&previous)?;
            }
            Ok(_) => fs::remove_file(&previous).at(&previous)?,
            Err(_) => {}
        }
    }
    fs::create_dir_all(dest).at(dest)?;

    match format {
        ArchiveFormat::TarGz => tarball::extract(archive, dest),
        ArchiveFormat::Zip => zipfile::extract(archive, dest),
    }
    .at(archive)?;

    info!(archive = %archive.display(), dest = %dest.display(), "extracted");
    Ok(())
}

/// First path component of each member, deduplicated. Components that
/// could reach outside `dest` (`..`, absolute) are never returned.
fn top_level_members(names: &[String]) -> Vec<String> {
    let mut tops: Vec<String> = names
        .iter()
        .filter_map(|name| name.split('/').find(|part| !part.is_empty() && *part != "."))
        .filter(|top| *top != "..")
        .map(str::to_string)
        .collect();
    tops.sort();
    tops.dedup();
    tops
}

fn detect(archive: &Path) -> Result<ArchiveFormat> {
    if !archive.is_file() {
        return Err(Error::SourceNotFound(archive.to_path_buf()));
    }
    ArchiveFormat::from_path(archive).ok_or_else(|| {
        Error::io(
            archive,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "unrecognized archive extension (expected .tar.gz or .zip)",
            ),
        )
    })
}

/// One filesystem object to store, in walk order.
pub(crate) struct Member {
    /// Location on disk
    pub path: PathBuf,
    /// Stored name, rooted at `basename(source_dir)`
    pub name: String,
    pub kind: MemberKind,
    pub meta: Metadata,
}

pub(crate) enum MemberKind {
    Directory,
    File,
    Symlink(PathBuf),
}

impl Member {
    /// Modification time to record, in seconds since the epoch.
    pub fn mtime(&self, options: ArchiveOptions) -> u64 {
        options.mtime.unwrap_or_else(|| {
            self.meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0)
        })
    }

    #[cfg(unix)]
    pub fn mode(&self) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        self.meta.permissions().mode() & 0o7777
    }

    #[cfg(not(unix))]
    pub fn mode(&self) -> u32 {
        match self.kind {
            MemberKind::File if self.meta.permissions().readonly() => 0o444,
            MemberKind::File => 0o644,
            _ => 0o755,
        }
    }
}

/// Walk `source_dir` in sorted order, without following links.
///
/// The first member is `source_dir` itself.
fn collect_members(source_dir: &Path) -> Result<Vec<Member>> {
    let base = source_dir.parent().unwrap_or(Path::new(""));
    let mut members = Vec::new();

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            Error::io(path, io::Error::from(e))
        })?;
        let path = entry.path().to_path_buf();
        let meta = fs::symlink_metadata(&path).at(&path)?;
        let kind = if meta.file_type().is_symlink() {
            MemberKind::Symlink(fs::read_link(&path).at(&path)?)
        } else if meta.is_dir() {
            MemberKind::Directory
        } else {
            MemberKind::File
        };

        members.push(Member {
            name: member_name(&path, base),
            path,
            kind,
            meta,
        });
    }

    Ok(members)
}

/// `path` relative to `base`, joined with `/` whatever the host separator.
fn member_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
