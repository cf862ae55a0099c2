//! Offline license verification.
//!
//! Stages run in order and the first failure wins:
//!
//! 1. Parse: tag, segment shape and alphabet
//! 2. Checksum
//! 3. Signature: the payload bytes are checked against the issuer public
//!    key, then decoded
//! 4. Policy: machine binding, then the validity window
//!
//! Verification is a pure function of the key string, the local machine id,
//! the local date and the public key. The clock is trusted; rolling it back
//! is not detected.

use chrono::{NaiveDate, Utc};
use licensor_crypto::{PublicKey, Signature};
use tracing::debug;

use crate::error::{LicenseError, LicenseResult};
use crate::format::parse_key;
use crate::payload::LicensePayload;
use crate::record::{LicenseDetails, VerifiedLicense};

/// Embedded Ed25519 public key of the license issuer (32 bytes).
///
/// Replacing it invalidates every key issued under the previous pair.
pub const LICENSE_PUBLIC_KEY: [u8; 32] = [
    248, 122, 144, 129, 15, 219, 151, 82, 198, 169, 134, 83, 235, 113, 148, 221,
    150, 71, 221, 52, 234, 54, 49, 241, 75, 91, 254, 135, 194, 32, 97, 166,
];

/// Verifies license keys against one issuer public key.
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    public_key: PublicKey,
}

impl Verifier {
    /// Creates a verifier for the embedded issuer key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyMaterial`] if the embedded key is not a
    /// valid Ed25519 point.
    pub fn embedded() -> LicenseResult<Self> {
        Ok(Self::with_key(PublicKey::from_bytes(&LICENSE_PUBLIC_KEY)?))
    }

    /// Creates a verifier for an explicit issuer key.
    #[must_use]
    pub fn with_key(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Verifies a key for this machine as of today's UTC date.
    pub fn verify(&self, key: &str, local_machine_id: &str) -> LicenseResult<VerifiedLicense> {
        self.verify_at(key, local_machine_id, Utc::now().date_naive())
    }

    /// Verifies a key for this machine as of `today`.
    pub fn verify_at(
        &self,
        key: &str,
        local_machine_id: &str,
        today: NaiveDate,
    ) -> LicenseResult<VerifiedLicense> {
        let payload = self.authenticate(key)?;

        if !payload.machine_id().matches(local_machine_id) {
            debug!("license rejected: machine mismatch");
            return Err(LicenseError::MachineMismatch);
        }

        let activation = payload.activation_date();
        let expiration = payload.expiration_date();
        if today < activation {
            debug!(%activation, "license rejected: not yet active");
            return Err(LicenseError::NotYetActive(activation));
        }
        if today > expiration {
            debug!(%expiration, "license rejected: expired");
            return Err(LicenseError::Expired(expiration));
        }

        let remaining_days = (expiration - today).num_days().clamp(0, i64::from(u32::MAX)) as u32;
        debug!(tier = %payload.tier(), remaining_days, "license valid");
        Ok(VerifiedLicense {
            details: LicenseDetails::from(&payload),
            remaining_days,
        })
    }

    /// Runs the parse, checksum and signature stages.
    ///
    /// Returns the authenticated payload without applying any policy.
    pub fn authenticate(&self, key: &str) -> LicenseResult<LicensePayload> {
        let parsed = parse_key(key).map_err(|e| {
            debug!(error = %e, "license rejected: malformed key");
            LicenseError::from(e)
        })?;

        let signature = Signature::from_bytes(&parsed.signature);
        if !self.public_key.verify(&parsed.payload, &signature) {
            debug!("license rejected: signature mismatch");
            return Err(LicenseError::SignatureMismatch);
        }

        // Decoding is strict, so signed bytes that decode are canonical.
        LicensePayload::decode(&parsed.payload).inspect_err(|e| {
            debug!(error = %e, "license rejected: undecodable payload");
        })
    }
}

/// Verifies a key with the embedded issuer key as of today's UTC date.
pub fn verify_license(key: &str, local_machine_id: &str) -> LicenseResult<VerifiedLicense> {
    Verifier::embedded()?.verify(key, local_machine_id)
}
