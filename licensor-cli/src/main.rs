//! Licensor issuer tool.
//!
//! Creates the issuer key pair, issues license key batches and checks keys
//! the same way the protected application does.
//!
//! Usage:
//!   licensor keygen --out issuer.key
//!   licensor generate --key issuer.key --tier yearly --machine-id ABC12345 --count 5
//!   licensor verify --key-string LK2-... --public-key <hex>
//!   licensor machine-id
//!
//! Records and verification results go to stdout as JSON. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use licensor_cli::{
    ISSUER_KEY_ENV, MachineReport, load_config, load_issuer_key, public_key_constant,
    write_issuer_key,
};
use licensor_crypto::{KeyPair, PublicKey};
use licensor_license::api::{self, GenerateRequest, VerifyRequest};
use licensor_license::{MachineId, Verifier};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "licensor")]
#[command(about = "Issue and verify Licensor license keys")]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new issuer key pair
    Keygen {
        /// Where to write the private key (must not exist)
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Issue a batch of license keys
    Generate {
        /// Path to the issuer private key file
        #[arg(short, long, env = ISSUER_KEY_ENV)]
        key: PathBuf,

        /// Subscription tier: monthly, quarterly or yearly
        #[arg(short, long)]
        tier: String,

        /// Machine id the licenses are bound to
        #[arg(short, long)]
        machine_id: String,

        /// Activation date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        activation_date: Option<String>,

        /// Number of keys to issue
        #[arg(short, long, default_value = "1")]
        count: i64,

        /// Generator configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Verify a license key
    Verify {
        /// The license key string
        #[arg(short, long)]
        key_string: String,

        /// Machine id to check against, defaults to this machine
        #[arg(short, long)]
        machine_id: Option<String>,

        /// Issuer public key as hex, defaults to the embedded key
        #[arg(short, long)]
        public_key: Option<String>,
    },

    /// Print this machine's id and device info
    MachineId,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Keygen { out } => keygen(out),
        Command::Generate {
            key,
            tier,
            machine_id,
            activation_date,
            count,
            config,
        } => generate(
            key,
            config,
            GenerateRequest {
                tier,
                machine_id,
                activation_date,
                count,
            },
        ),
        Command::Verify {
            key_string,
            machine_id,
            public_key,
        } => verify(key_string, machine_id, public_key),
        Command::MachineId => machine_id(),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn keygen(out: PathBuf) -> Result<()> {
    let pair = KeyPair::generate();
    write_issuer_key(&out, &pair.issuer_key)?;

    println!("\n========================================");
    println!("  Issuer key written to {}", out.display());
    println!("========================================");
    println!("  Public key: {}", pair.public_key.to_hex());
    println!("\n  Embed in the verifying build:");
    println!("  {}", public_key_constant(&pair.public_key));
    println!("========================================\n");
    Ok(())
}

fn generate(key_path: PathBuf, config_path: Option<PathBuf>, request: GenerateRequest) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    debug!(?config, "generator configuration");

    let records = {
        let key = load_issuer_key(&key_path)?;
        api::generate(&key, &config, &request)?
    };

    info!("Issued {} license(s)", records.len());
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn verify(key_string: String, machine_id: Option<String>, public_key: Option<String>) -> Result<()> {
    let machine_id = match machine_id {
        Some(id) => id,
        None => MachineId::current()
            .context("Failed to derive machine id")?
            .to_string(),
    };
    let verifier = match public_key {
        Some(hex) => Verifier::with_key(
            PublicKey::from_hex(&hex).context("Failed to decode public key")?,
        ),
        None => Verifier::embedded()?,
    };

    let response = api::verify(
        &verifier,
        &VerifyRequest {
            license_key: key_string,
            machine_id,
        },
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_valid() {
        std::process::exit(2);
    }
    Ok(())
}

fn machine_id() -> Result<()> {
    let report = MachineReport::collect()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
