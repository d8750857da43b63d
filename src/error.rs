//! Error types for manifest parsing, materialization and archiving.
//!
//! Every failure here is environmental (bad manifest, missing build artifact,
//! full disk), so nothing is retried. Errors carry the path or manifest line
//! that caused them.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// A manifest line that could not be turned into an entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Type tag outside `d`, `f`, `fx`, `s`
    #[error("line {line}: unknown entry type '{tag}'")]
    UnknownEntryType { tag: String, line: usize },

    #[error("line {line}: '{tag}' entry expects {expected} field(s), found {found}")]
    FieldCount {
        tag: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{tag}' entry has an empty path")]
    EmptyPath { tag: String, line: usize },

    /// Destination is absolute or climbs out with `..`
    #[error("line {line}: destination '{path}' escapes the package root")]
    EscapesRoot { path: String, line: usize },
}

/// Errors raised while building a package.
#[derive(Error, Debug)]
pub enum Error {
    #[error("manifest: {0}")]
    Parse(#[from] ParseError),

    /// Missing input file or directory for a copy, link or archive
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("permission denied: {}: {source}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Compression or output failure; the partial archive has been removed
    #[error("failed to write archive {}: {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A link already in the tree would carry a write outside the root
    #[error("{} resolves to {}, outside the package root", path.display(), resolved.display())]
    OutsideRoot { path: PathBuf, resolved: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("'{program}' failed (exit code {code})")]
    CommandFailed { program: String, code: i32 },
}

impl Error {
    /// Classify an I/O failure on `path`.
    ///
    /// `PermissionDenied` becomes [`Error::Permission`], everything else
    /// becomes [`Error::Io`].
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::Permission { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Wrap an I/O failure that happened while producing an archive.
    pub fn archive_write(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::ArchiveWrite {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach a path to a bare `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_classified() {
        let err = Error::io(
            "/root/secret",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, Error::Permission { .. }));

        let err = Error::io("/tmp/x", io::Error::from(io::ErrorKind::Other));
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_unknown_entry_type_message() {
        let err = ParseError::UnknownEntryType {
            tag: "x".to_string(),
            line: 7,
        };
        assert_eq!(err.to_string(), "line 7: unknown entry type 'x'");
    }
}
