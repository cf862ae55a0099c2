//! Key file, configuration and output helpers for the `licensor` tool.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use licensor_crypto::{IssuerKey, PublicKey};
use licensor_license::{DeviceInfo, GeneratorConfig, MachineId};
use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Environment variable holding the issuer key path.
pub const ISSUER_KEY_ENV: &str = "LICENSOR_ISSUER_KEY";

/// Reads a hex-encoded issuer key from `path`.
pub fn load_issuer_key(path: &Path) -> Result<IssuerKey> {
    debug!("Loading issuer key from {:?}", path);
    let text = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read issuer key file {}", path.display()))?,
    );
    IssuerKey::from_hex(&text).context("Failed to decode issuer key")
}

/// Writes `key` as hex to a new file at `path`.
///
/// Refuses to replace an existing file. On Unix the file is created with
/// owner-only permissions.
pub fn write_issuer_key(path: &Path, key: &IssuerKey) -> Result<()> {
    if path.exists() {
        bail!("Refusing to overwrite existing key file {}", path.display());
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to create key file {}", path.display()))?;
    let hex = key.to_hex();
    file.write_all(hex.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .context("Failed to write key file")?;

    info!("Wrote issuer key to {:?}", path);
    Ok(())
}

/// Loads the generator configuration from an optional TOML file.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<GeneratorConfig>(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Renders the public key as a Rust constant for embedding in a build.
pub fn public_key_constant(public_key: &PublicKey) -> String {
    let bytes: Vec<String> = public_key.to_bytes().iter().map(u8::to_string).collect();
    format!(
        "pub const LICENSE_PUBLIC_KEY: [u8; 32] = [{}];",
        bytes.join(", ")
    )
}

/// Output of the `machine-id` subcommand.
#[derive(Debug, Serialize)]
pub struct MachineReport {
    pub machine_id: MachineId,
    pub device: DeviceInfo,
}

impl MachineReport {
    /// Collects the report for the current device.
    pub fn collect() -> Result<Self> {
        Ok(Self {
            machine_id: MachineId::current().context("Failed to derive machine id")?,
            device: DeviceInfo::collect(),
        })
    }
}
