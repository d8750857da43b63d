//! Compiler build collaborator.
//!
//! The packager does not know how the compiler is built. It runs the
//! configured command in the compiler workspace with inherited stdio and
//! only checks the exit status; the manifest then picks up whatever the
//! build left at its declared output paths.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};

/// Run the configured compiler build to completion.
pub fn build(config: &Config) -> Result<()> {
    run_interactive(&config.compiler_build, &config.compiler_dir)
}

/// Locate the build program on `PATH` (or as given, if it is a path).
pub fn find_program(config: &Config) -> Option<PathBuf> {
    let program = config.compiler_build.first()?;
    which::which(program).ok()
}

/// Run `argv` in `dir`, streaming its output to the terminal.
pub fn run_interactive(argv: &[String], dir: &Path) -> Result<()> {
    let (program, args) = argv.split_first().ok_or_else(|| Error::CommandFailed {
        program: String::new(),
        code: -1,
    })?;

    info!(command = %argv.join(" "), dir = %dir.display(), "building compiler");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::io(dir, e))?;

    if !status.success() {
        return Err(Error::CommandFailed {
            program: program.clone(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
