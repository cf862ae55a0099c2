//! License issuance and offline verification for Licensor.
//!
//! This crate handles:
//! - Canonical binary encoding of license payloads
//! - Human-typable key strings with a checksum segment
//! - Ed25519 signature verification against an embedded public key
//! - Machine binding and validity windows per subscription tier
//! - Batch issuance for the generation tool (`issuer` feature)
//!
//! # Design Principles
//!
//! - **Offline**: verification needs only the key string, the local machine
//!   id, the local clock and the embedded public key
//! - **Fail closed**: every malformed or tampered key is a tagged rejection
//! - **Derived dates**: the expiration date is recomputed from the activation
//!   date and tier, never read from the key
//!
//! # License Key Format
//!
//! `LK2-` followed by 28 eight-symbol body segments (payload, signature and
//! zero padding) and one eight-symbol checksum segment. See [`format`] for details.

pub mod api;
mod config;
mod device;
mod error;
pub mod format;
#[cfg(feature = "issuer")]
mod generate;
mod machine;
mod payload;
mod record;
mod verify;

pub use config::{GeneratorConfig, DEFAULT_MAX_COUNT, MAX_COUNT_LIMIT};
pub use device::DeviceInfo;
pub use error::{ErrorCode, LicenseError, LicenseResult};
pub use format::{format_key, parse_key, FormatError, ParsedKey, KEY_TAG};
#[cfg(feature = "issuer")]
pub use generate::BatchGenerator;
pub use machine::{
    normalize as normalize_machine_id, MachineId, MAX_MACHINE_ID_LEN, MIN_MACHINE_ID_LEN,
};
pub use payload::{
    LicensePayload, LicenseTier, MAX_ACTIVATION_DAYS, PAYLOAD_SIZE, PAYLOAD_VERSION,
};
pub use record::{LicenseDetails, LicenseRecord, VerifiedLicense};
pub use verify::{verify_license, Verifier, LICENSE_PUBLIC_KEY};
