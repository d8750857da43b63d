//! Manifest parser: comma-separated lines to [`FileTreeEntry`] values.
//!
//! ```text
//! # comment
//! d,<relative-dir-path>
//! f,<relative-dst-path>,<source-path>
//! fx,<relative-dst-path>,<source-path>
//! s,<relative-dst-path>,<link-target-path>
//! ```
//!
//! Paths are written with `/` and translated to the host separator.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};

use super::FileTreeEntry;
use crate::error::ParseError;

pub const TAG_DIRECTORY: &str = "d";
pub const TAG_FILE: &str = "f";
pub const TAG_EXECUTABLE: &str = "fx";
pub const TAG_SYMLINK: &str = "s";

/// Parse manifest text into entries, in file order.
///
/// Blank lines and `#` comments are skipped. The first bad line stops the
/// parse, so a broken manifest never yields a partial entry list.
pub fn parse(text: &str) -> Result<Vec<FileTreeEntry>, ParseError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        entries.push(parse_line(trimmed, idx + 1)?);
    }
    Ok(entries)
}

fn parse_line(line_text: &str, line: usize) -> Result<FileTreeEntry, ParseError> {
    let fields: Vec<&str> = line_text.split(',').map(str::trim).collect();
    // split always yields at least one field
    let (tag, rest) = (fields[0], &fields[1..]);

    match tag {
        TAG_DIRECTORY => {
            expect_fields(tag, rest, 1, line)?;
            Ok(FileTreeEntry::Directory {
                path: dst_path(tag, rest[0], line)?,
            })
        }
        TAG_FILE => {
            expect_fields(tag, rest, 2, line)?;
            Ok(FileTreeEntry::File {
                dst: dst_path(tag, rest[0], line)?,
                src: native_path(tag, rest[1], line)?,
            })
        }
        TAG_EXECUTABLE => {
            expect_fields(tag, rest, 2, line)?;
            Ok(FileTreeEntry::ExecutableFile {
                dst: dst_path(tag, rest[0], line)?,
                src: native_path(tag, rest[1], line)?,
            })
        }
        TAG_SYMLINK => {
            expect_fields(tag, rest, 2, line)?;
            Ok(FileTreeEntry::Symlink {
                dst: dst_path(tag, rest[0], line)?,
                target: native_path(tag, rest[1], line)?,
            })
        }
        other => Err(ParseError::UnknownEntryType {
            tag: other.to_string(),
            line,
        }),
    }
}

fn expect_fields(tag: &str, rest: &[&str], expected: usize, line: usize) -> Result<(), ParseError> {
    if rest.len() != expected {
        return Err(ParseError::FieldCount {
            tag: tag.to_string(),
            line,
            expected,
            found: rest.len(),
        });
    }
    Ok(())
}

/// Translate a `/`-separated manifest path to the host convention.
fn native_path(tag: &str, raw: &str, line: usize) -> Result<PathBuf, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::EmptyPath {
            tag: tag.to_string(),
            line,
        });
    }
    Ok(PathBuf::from(raw.replace('/', MAIN_SEPARATOR_STR)))
}

/// A destination must stay under the package root.
fn dst_path(tag: &str, raw: &str, line: usize) -> Result<PathBuf, ParseError> {
    let path = native_path(tag, raw, line)?;
    let escapes = Path::new(&path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ParseError::EscapesRoot {
            path: raw.to_string(),
            line,
        });
    }
    Ok(path)
}
