//! DEFLATE zip encoding.
//!
//! Zip has no portable symlink member, so links in the tree are skipped.
//! Windows packages never contain any: the executor does not create them.

use chrono::{Datelike, Timelike, Utc};
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;
use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use super::{ArchiveOptions, Member, MemberKind};

const MAX_DEFLATE_LEVEL: i32 = 9;

pub(super) fn write<W: Write + Seek>(
    out: W,
    members: &[Member],
    options: ArchiveOptions,
) -> io::Result<()> {
    let mut zip = ZipWriter::new(out);

    for member in members {
        let file_options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(MAX_DEFLATE_LEVEL))
            .last_modified_time(dos_time(member.mtime(options)))
            .unix_permissions(member.mode());

        match &member.kind {
            MemberKind::Directory => {
                zip.add_directory(member.name.as_str(), file_options)?;
            }
            MemberKind::File => {
                zip.start_file(member.name.as_str(), file_options)?;
                let mut file = File::open(&member.path)?;
                io::copy(&mut file, &mut zip)?;
            }
            MemberKind::Symlink(target) => {
                warn!(
                    member = %member.name,
                    target = %target.display(),
                    "zip archives do not carry symlinks, skipping"
                );
            }
        }
    }

    zip.finish()?.flush()
}

/// Convert epoch seconds to a zip timestamp. Out-of-range values
/// (before 1980 or after 2107) fall back to 1980-01-01.
fn dos_time(secs: u64) -> DateTime {
    let secs = i64::try_from(secs).unwrap_or(i64::MAX);
    chrono::DateTime::<Utc>::from_timestamp(secs, 0)
        .and_then(|t| {
            let year = u16::try_from(t.year()).ok()?;
            DateTime::from_date_and_time(
                year,
                t.month() as u8,
                t.day() as u8,
                t.hour() as u8,
                t.minute() as u8,
                t.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

pub(super) fn list(path: &Path) -> io::Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

pub(super) fn extract(path: &Path, dest: &Path) -> io::Result<()> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    archive.extract(dest)?;
    Ok(())
}
