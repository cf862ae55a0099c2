//! Local machine identity for license binding.
//!
//! The verifying application derives its machine id from stable hardware
//! identifiers. The id is hex, so it already satisfies machine id
//! normalization and can be shown to a user for their license request.

use licensor_crypto::sha256;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::LicenseResult;
use crate::machine::MachineId;

/// Information about the current device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Operating system name.
    pub os_name: String,
    /// Operating system version.
    pub os_version: String,
    /// Hostname.
    pub hostname: String,
    /// CPU architecture.
    pub arch: String,
}

impl DeviceInfo {
    /// Collects information about the current device.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os_name: env::consts::OS.to_string(),
            os_version: get_os_version(),
            hostname: get_hostname(),
            arch: env::consts::ARCH.to_string(),
        }
    }
}

impl MachineId {
    /// Derives the machine id of the current device.
    ///
    /// SHA-256 over the hardware identifiers as uppercase hex (64 characters).
    /// Stable across reboots; changes if the hardware or hostname does.
    pub fn current() -> LicenseResult<Self> {
        let combined = collect_hardware_ids().join("|");
        Self::parse(&hex::encode_upper(sha256(&[combined.as_bytes()])))
    }
}

/// Hardware identifiers hashed into the machine id, most stable first.
fn collect_hardware_ids() -> Vec<String> {
    let mut ids = vec![
        env::consts::OS.to_string(),
        env::consts::ARCH.to_string(),
        get_hostname(),
    ];
    ids.extend(platform_uuid());
    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        ids.push(user);
    }
    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Runs `program` and returns its trimmed stdout, if it succeeded.
#[cfg(any(target_os = "macos", target_os = "windows"))]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

/// Returns the value of a `KEY=value` line, without quotes.
#[cfg(target_os = "linux")]
fn key_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .lines()
        .find_map(|l| l.strip_prefix(key)?.strip_prefix('='))
        .map(|v| v.trim_matches('"'))
}

fn get_os_version() -> String {
    #[cfg(target_os = "macos")]
    let version = command_output("sw_vers", &["-productVersion"]);

    #[cfg(target_os = "linux")]
    let version = std::fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| key_value(&content, "VERSION_ID").map(str::to_string));

    #[cfg(target_os = "windows")]
    let version = command_output("cmd", &["/C", "ver"]);

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let version: Option<String> = None;

    version
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Platform-assigned machine UUID.
fn platform_uuid() -> Option<String> {
    #[cfg(target_os = "macos")]
    let uuid = command_output("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"]).and_then(
        |output| {
            output
                .lines()
                .find(|l| l.contains("IOPlatformUUID"))
                .and_then(|l| l.split('"').nth(3))
                .map(String::from)
        },
    );

    #[cfg(target_os = "linux")]
    let uuid = ["/etc/machine-id", "/var/lib/dbus/machine-id"]
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok())
        .map(|s| s.trim().to_string());

    // `wmic` prints a "UUID" header line before the value.
    #[cfg(target_os = "windows")]
    let uuid = command_output("wmic", &["csproduct", "get", "UUID"]).and_then(|output| {
        output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.eq_ignore_ascii_case("UUID"))
            .map(String::from)
    });

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let uuid: Option<String> = None;

    uuid.filter(|u| !u.is_empty())
}
