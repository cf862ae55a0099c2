//! Request and response shapes for the two external callers.
//!
//! The generation tool sends a [`GenerateRequest`] and gets back an ordered
//! list of [`LicenseRecord`]s. The protected application sends a
//! [`VerifyRequest`] and gets a [`VerifyResponse`]. Failures carry a stable
//! [`ErrorCode`] plus a message fit for display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LicenseError, LicenseResult};
use crate::record::VerifiedLicense;
use crate::verify::Verifier;

#[cfg(feature = "issuer")]
use crate::{
    config::GeneratorConfig, generate::BatchGenerator, payload::LicenseTier,
    record::LicenseRecord,
};
#[cfg(feature = "issuer")]
use licensor_crypto::IssuerKey;

/// Batch generation request from the license-generator tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// `monthly`, `quarterly` or `yearly`.
    pub tier: String,
    pub machine_id: String,
    /// ISO calendar date (`YYYY-MM-DD`); today when absent.
    #[serde(default)]
    pub activation_date: Option<String>,
    pub count: i64,
}

/// Verification request from the protected application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub license_key: String,
    /// The verifying machine's own id.
    pub machine_id: String,
}

/// A user-displayable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&LicenseError> for ApiError {
    fn from(err: &LicenseError) -> Self {
        Self {
            code: err.code(),
            message: err.user_message(),
        }
    }
}

impl From<LicenseError> for ApiError {
    fn from(err: LicenseError) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Outcome of a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyResponse {
    Valid {
        #[serde(flatten)]
        license: VerifiedLicense,
    },
    Rejected {
        #[serde(flatten)]
        error: ApiError,
    },
}

impl VerifyResponse {
    /// Returns true for a valid license.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl From<LicenseResult<VerifiedLicense>> for VerifyResponse {
    fn from(result: LicenseResult<VerifiedLicense>) -> Self {
        match result {
            Ok(license) => Self::Valid { license },
            Err(err) => Self::Rejected {
                error: ApiError::from(&err),
            },
        }
    }
}

/// Parses an ISO calendar date from the boundary.
///
/// # Errors
///
/// Returns [`LicenseError::InvalidInput`] if `text` is not `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> LicenseResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| {
            LicenseError::InvalidInput(format!("invalid date {text:?} (expected YYYY-MM-DD)"))
        })
}

/// Handles a generation request with the given issuer key.
///
/// # Errors
///
/// Returns an [`ApiError`] with code `invalid_input` for any request that
/// fails validation.
#[cfg(feature = "issuer")]
pub fn generate(
    key: &IssuerKey,
    config: &GeneratorConfig,
    request: &GenerateRequest,
) -> Result<Vec<LicenseRecord>, ApiError> {
    let tier: LicenseTier = request.tier.parse()?;
    let activation_date = request
        .activation_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_date)
        .transpose()?;
    let count = usize::try_from(request.count).map_err(|_| {
        LicenseError::InvalidInput(format!("count must be between 1 and {}", config.max_count))
    })?;

    let generator = BatchGenerator::new(key, config.clone())?;
    Ok(generator.generate(tier, &request.machine_id, activation_date, count)?)
}

/// Handles a verification request with the given verifier.
#[must_use]
pub fn verify(verifier: &Verifier, request: &VerifyRequest) -> VerifyResponse {
    verifier
        .verify(&request.license_key, &request.machine_id)
        .into()
}

/// Handles a verification request with the embedded issuer key.
#[must_use]
pub fn verify_embedded(request: &VerifyRequest) -> VerifyResponse {
    match Verifier::embedded() {
        Ok(verifier) => verify(&verifier, request),
        Err(err) => VerifyResponse::Rejected {
            error: ApiError::from(err),
        },
    }
}
