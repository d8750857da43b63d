//! Preflight checks for a package build.
//!
//! Reports every problem at once (unparseable manifest, missing sources,
//! missing build program) without touching the output tree. The build
//! itself stays fail-fast; this is the place to see the whole picture.

mod types;

pub use types::{CheckResult, CheckStatus, PreflightReport};

use std::path::Path;
use tracing::info;

use crate::compiler;
use crate::config::Config;
use crate::tree::Manifest;

/// Run all preflight checks.
///
/// `check_compiler` adds the compiler build program check.
pub fn run_preflight(config: &Config, check_compiler: bool) -> PreflightReport {
    info!("running preflight checks");
    let mut checks = Vec::new();

    checks.extend(check_manifest(&config.manifest, &config.source_root));
    checks.push(check_output(&config.output));

    if check_compiler {
        checks.push(match compiler::find_program(config) {
            Some(path) => CheckResult::pass_with("compiler build program", &path.display().to_string()),
            None => CheckResult::fail(
                "compiler build program",
                &format!("'{}' not found in PATH", config.compiler_build.join(" ")),
            ),
        });
    } else {
        checks.push(CheckResult::skip("compiler build program", "compiler build disabled"));
    }

    PreflightReport { checks }
}

/// Parse the manifest and check every source it reads.
pub fn check_manifest(manifest_path: &Path, source_root: &Path) -> Vec<CheckResult> {
    let manifest = match Manifest::load(manifest_path, source_root) {
        Ok(manifest) => manifest,
        Err(e) => return vec![CheckResult::fail("manifest", &e.to_string())],
    };

    let mut checks = vec![CheckResult::pass_with(
        "manifest",
        &format!("{} entries", manifest.len()),
    )];

    let mut present = 0;
    for src in manifest.sources() {
        if src.exists() {
            present += 1;
        } else {
            checks.push(CheckResult::fail("source", &format!("missing {}", src.display())));
        }
    }
    checks.push(CheckResult::pass_with(
        "sources",
        &format!("{} present", present),
    ));

    checks
}

fn check_output(output: &Path) -> CheckResult {
    if output.is_dir() {
        CheckResult::pass_with("output directory", &output.display().to_string())
    } else if output.exists() {
        CheckResult::fail(
            "output directory",
            &format!("{} exists and is not a directory", output.display()),
        )
    } else {
        CheckResult::warn(
            "output directory",
            &format!("{} will be created", output.display()),
        )
    }
}
