//! License records shared by the issuing and verifying sides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payload::{LicensePayload, LicenseTier};

/// License details both sides display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDetails {
    pub tier: LicenseTier,
    pub machine_id: String,
    pub activation_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub days_valid: u32,
}

impl From<&LicensePayload> for LicenseDetails {
    fn from(payload: &LicensePayload) -> Self {
        Self {
            tier: payload.tier(),
            machine_id: payload.machine_id().to_string(),
            activation_date: payload.activation_date(),
            expiration_date: payload.expiration_date(),
            days_valid: payload.days_valid(),
        }
    }
}

/// One issued license, as returned to the generation tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub license_key: String,
    #[serde(flatten)]
    pub details: LicenseDetails,
}

/// A license that passed every verification stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedLicense {
    #[serde(flatten)]
    pub details: LicenseDetails,
    /// Days left until the expiration date; `0` on the expiration day.
    pub remaining_days: u32,
}

impl VerifiedLicense {
    #[must_use]
    pub fn tier(&self) -> LicenseTier {
        self.details.tier
    }

    #[must_use]
    pub fn expiration_date(&self) -> NaiveDate {
        self.details.expiration_date
    }
}
