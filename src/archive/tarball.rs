//! gzip-compressed tar encoding.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tar::{Archive, Builder, Header, HeaderMode};

use super::{ArchiveOptions, Member, MemberKind};

/// Write `members` as a tar stream at maximum gzip compression.
pub(super) fn write<W: Write>(out: W, members: &[Member], options: ArchiveOptions) -> io::Result<()> {
    let encoder = GzEncoder::new(out, Compression::best());
    let mut builder = Builder::new(encoder);

    // Fixed timestamps also drop ownership, so the stream is reproducible
    let mode = match options.mtime {
        Some(_) => HeaderMode::Deterministic,
        None => HeaderMode::Complete,
    };

    for member in members {
        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(&member.meta, mode);
        header.set_mtime(member.mtime(options));

        match &member.kind {
            MemberKind::Directory => {
                header.set_size(0);
                builder.append_data(&mut header, &member.name, io::empty())?;
            }
            MemberKind::File => {
                let file = File::open(&member.path)?;
                builder.append_data(&mut header, &member.name, file)?;
            }
            MemberKind::Symlink(target) => {
                header.set_size(0);
                builder.append_link(&mut header, &member.name, target)?;
            }
        }
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?.flush()
}

pub(super) fn list(path: &Path) -> io::Result<Vec<String>> {
    let mut archive = Archive::new(GzDecoder::new(File::open(path)?));
    let mut names = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        names.push(entry.path()?.to_string_lossy().into_owned());
    }
    Ok(names)
}

pub(super) fn extract(path: &Path, dest: &Path) -> io::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(File::open(path)?));
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.unpack(dest)
}
