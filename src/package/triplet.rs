//! Target triplet resolution.
//!
//! A triplet is `<cpu>-<vendor>-<os>[<abi>]`, e.g. `x86_64-unknown-linux-gnu`.
//! The rest of the crate treats it as an opaque string.

use crate::error::{Error, Result};

/// Join explicit parts: `x86_64`, `unknown`, `linux` -> `x86_64-unknown-linux`.
pub fn from_parts(arch: &str, vendor: &str, os: &str) -> String {
    [arch, vendor, os].join("-")
}

/// Triplet of the machine running this process.
pub fn host() -> Result<String> {
    host_from(std::env::consts::OS, std::env::consts::ARCH)
}

/// Map an OS name and CPU name to a triplet.
///
/// Accepts both Rust's `std::env::consts` spellings and `uname` spellings
/// (`Linux`, `Darwin`, `amd64`, `i386`, ...).
pub fn host_from(os: &str, cpu: &str) -> Result<String> {
    let os = os.to_ascii_lowercase();
    let cpu = cpu.to_ascii_lowercase();

    let mut os_part = match os.as_str() {
        "android" => "linux-android".to_string(),
        "linux" => "unknown-linux-gnu".to_string(),
        "macos" | "darwin" => "apple-darwin".to_string(),
        "freebsd" => "unknown-freebsd".to_string(),
        "netbsd" => "unknown-netbsd".to_string(),
        "windows" => "pc-windows-msvc".to_string(),
        other => {
            return Err(Error::UnsupportedHost(format!(
                "unrecognized OS type: {}",
                other
            )))
        }
    };

    let cpu_part = match cpu.as_str() {
        "i386" | "i486" | "i686" | "i786" | "x86" => "i686",
        "arm" => {
            os_part = if os_part == "linux-android" {
                "linux-androideabi".to_string()
            } else {
                format!("{}eabihf", os_part)
            };
            "arm"
        }
        "aarch64" | "arm64" => "aarch64",
        "x86_64" | "x86-64" | "x64" | "amd64" => "x86_64",
        other => {
            return Err(Error::UnsupportedHost(format!(
                "unrecognized CPU type: {}",
                other
            )))
        }
    };

    Ok(format!("{}-{}", cpu_part, os_part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(from_parts("x86_64", "unknown", "linux"), "x86_64-unknown-linux");
    }

    #[test]
    fn test_linux_hosts() {
        assert_eq!(
            host_from("linux", "x86_64").unwrap(),
            "x86_64-unknown-linux-gnu"
        );
        assert_eq!(host_from("Linux", "amd64").unwrap(), "x86_64-unknown-linux-gnu");
        assert_eq!(host_from("linux", "i386").unwrap(), "i686-unknown-linux-gnu");
        assert_eq!(
            host_from("linux", "arm").unwrap(),
            "arm-unknown-linux-gnueabihf"
        );
    }

    #[test]
    fn test_other_hosts() {
        assert_eq!(host_from("macos", "aarch64").unwrap(), "aarch64-apple-darwin");
        assert_eq!(host_from("Darwin", "arm64").unwrap(), "aarch64-apple-darwin");
        assert_eq!(host_from("android", "arm").unwrap(), "arm-linux-androideabi");
        assert_eq!(host_from("freebsd", "x86_64").unwrap(), "x86_64-unknown-freebsd");
        assert_eq!(host_from("windows", "x86_64").unwrap(), "x86_64-pc-windows-msvc");
    }

    #[test]
    fn test_unknown_host_is_an_error() {
        assert!(matches!(
            host_from("plan9", "x86_64"),
            Err(Error::UnsupportedHost(_))
        ));
        assert!(matches!(
            host_from("linux", "sparc"),
            Err(Error::UnsupportedHost(_))
        ));
    }

    #[test]
    fn test_current_host_resolves() {
        // Every platform CI runs on is in the table
        assert!(host().is_ok());
    }
}
