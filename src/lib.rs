//! vsp-distro library exports.
//!
//! Packages a built vsp toolchain into a release archive: parse the
//! file-tree manifest, materialize it under `<output>/<package>`, and
//! compress that directory into a `.tar.gz` or `.zip`.

pub mod archive;
pub mod checksum;
pub mod clean;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod package;
pub mod preflight;
pub mod timing;
pub mod tree;

pub use error::{Error, ParseError, Result};
pub use package::{package, PackageDescriptor, PackagingError, PlatformKind, Stage};
pub use tree::{FileTreeEntry, Manifest};
