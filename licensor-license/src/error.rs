//! Error types for license issuance and verification.

use chrono::NaiveDate;
use licensor_crypto::CryptoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::FormatError;

/// Licensing errors.
///
/// Every rejection a verifier can produce is one of these variants, so
/// callers always receive a tagged result instead of a panic.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Generation request failed validation before any signing work.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Key string failed parsing, checksum or payload decoding.
    #[error("invalid license key format: {0}")]
    MalformedKey(String),

    /// Key parsed cleanly but the signature does not match.
    #[error("license key signature invalid")]
    SignatureMismatch,

    /// Signature is valid but the license is bound to another machine.
    #[error("license not valid for this device")]
    MachineMismatch,

    /// License activation date is in the future.
    #[error("license not active until {0}")]
    NotYetActive(NaiveDate),

    /// License expiration date has passed.
    #[error("license expired on {0}")]
    Expired(NaiveDate),

    /// Issuer or embedded public key material is unusable.
    #[error("key material error: {0}")]
    KeyMaterial(#[from] CryptoError),
}

impl From<FormatError> for LicenseError {
    fn from(err: FormatError) -> Self {
        Self::MalformedKey(err.to_string())
    }
}

/// Stable, machine-readable error codes for the caller boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    MalformedKey,
    SignatureMismatch,
    MachineMismatch,
    NotYetActive,
    Expired,
    KeyMaterial,
}

impl ErrorCode {
    /// Returns the wire name of this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::MalformedKey => "malformed_key",
            Self::SignatureMismatch => "signature_mismatch",
            Self::MachineMismatch => "machine_mismatch",
            Self::NotYetActive => "not_yet_active",
            Self::Expired => "expired",
            Self::KeyMaterial => "key_material",
        }
    }
}

impl LicenseError {
    /// Returns the boundary error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::MalformedKey(_) => ErrorCode::MalformedKey,
            Self::SignatureMismatch => ErrorCode::SignatureMismatch,
            Self::MachineMismatch => ErrorCode::MachineMismatch,
            Self::NotYetActive(_) => ErrorCode::NotYetActive,
            Self::Expired(_) => ErrorCode::Expired,
            Self::KeyMaterial(_) => ErrorCode::KeyMaterial,
        }
    }

    /// Returns the message shown to an end user.
    ///
    /// Forged and tampered keys share one message. Format problems keep
    /// their detail out of the message; it only goes to logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(reason) => reason.clone(),
            Self::MalformedKey(_) => "invalid license key format".to_string(),
            Self::SignatureMismatch => "license key is not valid".to_string(),
            Self::MachineMismatch => "license not valid for this device".to_string(),
            Self::NotYetActive(date) => format!("license is not active until {date}"),
            Self::Expired(date) => format!("license expired on {date}"),
            Self::KeyMaterial(_) => "license key material is unavailable".to_string(),
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
