//! Preflight command - runs preflight checks.

use anyhow::Result;

use vsp_distro::config::Config;
use vsp_distro::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(config: &Config, check_compiler: bool, strict: bool) -> Result<()> {
    let report = preflight::run_preflight(config, check_compiler);
    report.print();

    if !report.all_passed() {
        if strict {
            anyhow::bail!("preflight failed with {} error(s)", report.fail_count());
        }
        println!("Some checks failed. Use --strict to exit non-zero.");
    }
    Ok(())
}
