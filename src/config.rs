//! Configuration management for vsp-distro.
//!
//! Reads configuration from a `.env` file and environment variables.
//! Environment variables take precedence over the `.env` file.

use std::env;
use std::path::{Path, PathBuf};

/// Default manifest location, relative to the base directory.
pub const DEFAULT_MANIFEST: &str = "resources/file-tree.csv";
/// Default output base, relative to the base directory.
pub const DEFAULT_OUTPUT: &str = "target";
/// Default compiler workspace, relative to the base directory.
pub const DEFAULT_COMPILER_DIR: &str = "src/compiler";
/// Default command that builds the compiler.
pub const DEFAULT_COMPILER_BUILD: &str = "make build";

/// vsp-distro configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory receiving package roots and archives (default: target)
    pub output: PathBuf,
    /// File-tree manifest (default: resources/file-tree.csv)
    pub manifest: PathBuf,
    /// Root relative manifest sources resolve against (default: base dir)
    pub source_root: PathBuf,
    /// Working directory of the compiler build
    pub compiler_dir: PathBuf,
    /// Compiler build command, split on whitespace
    pub compiler_build: Vec<String>,
    /// Fixed archive mtime, from SOURCE_DATE_EPOCH
    pub source_date_epoch: Option<u64>,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Self {
        // A missing .env is normal; real env vars are never overridden
        dotenvy::from_path(base_dir.join(".env")).ok();
        Self::from_lookup(base_dir, |key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(base_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str, default: &str| {
            let raw = lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string());
            resolve(base_dir, Path::new(raw.trim()))
        };

        let compiler_build = lookup("VSP_COMPILER_BUILD")
            .unwrap_or_else(|| DEFAULT_COMPILER_BUILD.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let source_date_epoch = lookup("SOURCE_DATE_EPOCH").and_then(|s| s.trim().parse().ok());

        Self {
            output: path("VSP_DISTRO_OUTPUT", DEFAULT_OUTPUT),
            manifest: path("VSP_DISTRO_MANIFEST", DEFAULT_MANIFEST),
            source_root: path("VSP_DISTRO_SOURCE_ROOT", "."),
            compiler_dir: path("VSP_COMPILER_DIR", DEFAULT_COMPILER_DIR),
            compiler_build,
            source_date_epoch,
        }
    }

    /// Apply command-line path overrides; relative ones join onto `base_dir`.
    pub fn override_paths(
        &mut self,
        base_dir: &Path,
        manifest: Option<PathBuf>,
        output: Option<PathBuf>,
        source_root: Option<PathBuf>,
    ) {
        if let Some(path) = manifest {
            self.manifest = resolve(base_dir, &path);
        }
        if let Some(path) = output {
            self.output = resolve(base_dir, &path);
        }
        if let Some(path) = source_root {
            self.source_root = resolve(base_dir, &path);
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  VSP_DISTRO_OUTPUT: {}", self.output.display());
        println!("  VSP_DISTRO_MANIFEST: {}", self.manifest.display());
        println!("  VSP_DISTRO_SOURCE_ROOT: {}", self.source_root.display());
        println!("  VSP_COMPILER_DIR: {}", self.compiler_dir.display());
        println!("  VSP_COMPILER_BUILD: {}", self.compiler_build.join(" "));
        match self.source_date_epoch {
            Some(epoch) => println!("  SOURCE_DATE_EPOCH: {}", epoch),
            None => println!("  SOURCE_DATE_EPOCH: (unset, on-disk timestamps)"),
        }
        if self.manifest.is_file() {
            println!("  Manifest: FOUND");
        } else {
            println!("  Manifest: NOT FOUND");
        }
    }
}

/// Absolute paths pass through; relative ones join onto `base_dir`.
pub fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        base_dir.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_resolve_against_base() {
        let config = Config::from_lookup(Path::new("/repo"), lookup_from(&[]));

        assert_eq!(config.output, PathBuf::from("/repo/target"));
        assert_eq!(config.manifest, PathBuf::from("/repo/resources/file-tree.csv"));
        assert_eq!(config.source_root, PathBuf::from("/repo"));
        assert_eq!(config.compiler_dir, PathBuf::from("/repo/src/compiler"));
        assert_eq!(config.compiler_build, vec!["make", "build"]);
        assert_eq!(config.source_date_epoch, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(
            Path::new("/repo"),
            lookup_from(&[
                ("VSP_DISTRO_OUTPUT", "/tmp/out"),
                ("VSP_DISTRO_MANIFEST", "dist/tree.csv"),
                ("VSP_COMPILER_BUILD", "cargo build --release"),
                ("SOURCE_DATE_EPOCH", "1704067200"),
            ]),
        );

        assert_eq!(config.output, PathBuf::from("/tmp/out"));
        assert_eq!(config.manifest, PathBuf::from("/repo/dist/tree.csv"));
        assert_eq!(config.compiler_build, vec!["cargo", "build", "--release"]);
        assert_eq!(config.source_date_epoch, Some(1704067200));
    }

    #[test]
    fn test_bad_epoch_is_ignored() {
        let config = Config::from_lookup(
            Path::new("/repo"),
            lookup_from(&[("SOURCE_DATE_EPOCH", "yesterday")]),
        );
        assert_eq!(config.source_date_epoch, None);
    }

    #[test]
    fn test_cli_overrides_replace_env_values() {
        let mut config = Config::from_lookup(
            Path::new("/repo"),
            lookup_from(&[("VSP_DISTRO_OUTPUT", "/tmp/out")]),
        );
        config.override_paths(
            Path::new("/work"),
            Some(PathBuf::from("tree.csv")),
            Some(PathBuf::from("/dist")),
            None,
        );

        assert_eq!(config.manifest, PathBuf::from("/work/tree.csv"));
        assert_eq!(config.output, PathBuf::from("/dist"));
        assert_eq!(config.source_root, PathBuf::from("/repo"));
    }

    #[test]
    #[serial]
    fn test_load_reads_dotenv_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".env"),
            "# local overrides\nVSP_DISTRO_TEST_ONLY_OUTPUT=ignored\nVSP_DISTRO_MANIFEST=\"custom/tree.csv\"\n",
        )
        .unwrap();
        env::remove_var("VSP_DISTRO_MANIFEST");

        let config = Config::load(temp.path());
        env::remove_var("VSP_DISTRO_MANIFEST");
        env::remove_var("VSP_DISTRO_TEST_ONLY_OUTPUT");

        assert_eq!(config.manifest, temp.path().join("custom/tree.csv"));
    }
}
