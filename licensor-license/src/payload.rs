//! Signed license content and its canonical byte encoding.
//!
//! Layout (big-endian integers, 73 bytes):
//!
//! ```text
//! ┌─────────┬──────┬─────┬──────────────────────┬──────────┬───────┐
//! │ version │ tier │ len │ machine id (64, pad) │ act.days │ nonce │
//! │    1    │  1   │  1  │          64          │    2     │   4   │
//! └─────────┴──────┴─────┴──────────────────────┴──────────┴───────┘
//! ```
//!
//! The activation date is stored as days since 2020-01-01. The expiration
//! date is never stored; it is recomputed from the activation date and tier.
//! Decoding only accepts bytes that `encode` could have produced, so every
//! accepted byte string re-encodes to itself.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{LicenseError, LicenseResult};
use crate::machine::{is_machine_id_byte, MachineId, MAX_MACHINE_ID_LEN, MIN_MACHINE_ID_LEN};

/// Version byte of the payload layout.
pub const PAYLOAD_VERSION: u8 = 1;

/// Encoded payload size in bytes.
pub const PAYLOAD_SIZE: usize = 73;

/// Day number (days from the common era) of the date epoch, 2020-01-01.
const EPOCH_DAY_NUMBER: i32 = 737_425;

/// Latest activation date, as days since the epoch (2070-01-01).
pub const MAX_ACTIVATION_DAYS: u16 = 18_263;

const TIER_OFFSET: usize = 1;
const ID_LEN_OFFSET: usize = 2;
const ID_OFFSET: usize = 3;
const DATE_OFFSET: usize = ID_OFFSET + MAX_MACHINE_ID_LEN;
const NONCE_OFFSET: usize = DATE_OFFSET + 2;

/// Subscription tier. Controls the validity duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    /// 30 days.
    Monthly,
    /// 90 days.
    Quarterly,
    /// 365 days.
    Yearly,
}

impl LicenseTier {
    /// All tiers, in wire order.
    pub const ALL: [Self; 3] = [Self::Monthly, Self::Quarterly, Self::Yearly];

    /// Returns the number of days a license of this tier is valid.
    #[must_use]
    pub fn days_valid(&self) -> u32 {
        match self {
            Self::Monthly => 30,
            Self::Quarterly => 90,
            Self::Yearly => 365,
        }
    }

    /// Returns the lowercase tier name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::Monthly => 0,
            Self::Quarterly => 1,
            Self::Yearly => 2,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Monthly),
            1 => Some(Self::Quarterly),
            2 => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseTier {
    type Err = LicenseError;

    fn from_str(s: &str) -> LicenseResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(LicenseError::InvalidInput(format!(
                "unknown tier {other:?} (expected monthly, quarterly or yearly)"
            ))),
        }
    }
}

/// The signed license content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicensePayload {
    tier: LicenseTier,
    machine_id: MachineId,
    activation_date: NaiveDate,
    nonce: u32,
}

impl LicensePayload {
    /// Builds a payload, rejecting activation dates the encoding cannot hold.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidInput`] if `activation_date` is before
    /// 2020-01-01 or after 2070-01-01.
    pub fn new(
        tier: LicenseTier,
        machine_id: MachineId,
        activation_date: NaiveDate,
        nonce: u32,
    ) -> LicenseResult<Self> {
        days_since_epoch(activation_date)?;
        Ok(Self {
            tier,
            machine_id,
            activation_date,
            nonce,
        })
    }

    /// Returns a copy of this payload with another nonce.
    #[must_use]
    pub fn with_nonce(&self, nonce: u32) -> Self {
        Self {
            nonce,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn tier(&self) -> LicenseTier {
        self.tier
    }

    #[must_use]
    pub fn machine_id(&self) -> &MachineId {
        &self.machine_id
    }

    #[must_use]
    pub fn activation_date(&self) -> NaiveDate {
        self.activation_date
    }

    #[must_use]
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Returns the number of days this license is valid; fixed by the tier.
    #[must_use]
    pub fn days_valid(&self) -> u32 {
        self.tier.days_valid()
    }

    /// Returns `activation_date + days_valid`.
    #[must_use]
    pub fn expiration_date(&self) -> NaiveDate {
        // Activation is bounded to 2070, far from the end of NaiveDate's range.
        self.activation_date + Days::new(u64::from(self.days_valid()))
    }

    /// Encodes the payload into its canonical bytes.
    #[must_use]
    pub fn encode(&self) -> [u8; PAYLOAD_SIZE] {
        let mut out = [0u8; PAYLOAD_SIZE];
        out[0] = PAYLOAD_VERSION;
        out[TIER_OFFSET] = self.tier.to_byte();

        let id = self.machine_id.as_str().as_bytes();
        out[ID_LEN_OFFSET] = id.len() as u8;
        out[ID_OFFSET..ID_OFFSET + id.len()].copy_from_slice(id);

        // Range was checked in `new`.
        let days = days_since_epoch(self.activation_date).unwrap_or_default();
        out[DATE_OFFSET..NONCE_OFFSET].copy_from_slice(&days.to_be_bytes());
        out[NONCE_OFFSET..].copy_from_slice(&self.nonce.to_be_bytes());
        out
    }

    /// Decodes canonical payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::MalformedKey`] for any byte string `encode`
    /// would not produce.
    pub fn decode(bytes: &[u8]) -> LicenseResult<Self> {
        if bytes.len() != PAYLOAD_SIZE {
            return Err(malformed(format!(
                "payload must be {PAYLOAD_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0] != PAYLOAD_VERSION {
            return Err(malformed(format!(
                "unsupported payload version {}",
                bytes[0]
            )));
        }

        let tier = LicenseTier::from_byte(bytes[TIER_OFFSET])
            .ok_or_else(|| malformed(format!("unknown tier byte {}", bytes[TIER_OFFSET])))?;

        let id_len = usize::from(bytes[ID_LEN_OFFSET]);
        if !(MIN_MACHINE_ID_LEN..=MAX_MACHINE_ID_LEN).contains(&id_len) {
            return Err(malformed(format!("machine id length {id_len} out of range")));
        }
        let id_field = &bytes[ID_OFFSET..DATE_OFFSET];
        let (id_bytes, padding) = id_field.split_at(id_len);
        if !id_bytes.iter().all(|b| is_machine_id_byte(*b)) {
            return Err(malformed("machine id contains unsupported bytes"));
        }
        if padding.iter().any(|b| *b != 0) {
            return Err(malformed("machine id padding is not zero"));
        }
        // Accepted bytes are ASCII, so this conversion cannot fail.
        let id_text = std::str::from_utf8(id_bytes)
            .map_err(|_| malformed("machine id is not ASCII"))?;
        let machine_id =
            MachineId::parse(id_text).map_err(|e| malformed(format!("machine id: {e}")))?;

        let days = u16::from_be_bytes([bytes[DATE_OFFSET], bytes[DATE_OFFSET + 1]]);
        let activation_date = date_from_days(days)?;

        let nonce = u32::from_be_bytes([
            bytes[NONCE_OFFSET],
            bytes[NONCE_OFFSET + 1],
            bytes[NONCE_OFFSET + 2],
            bytes[NONCE_OFFSET + 3],
        ]);

        Ok(Self {
            tier,
            machine_id,
            activation_date,
            nonce,
        })
    }
}

fn malformed(reason: impl Into<String>) -> LicenseError {
    LicenseError::MalformedKey(reason.into())
}

fn days_since_epoch(date: NaiveDate) -> LicenseResult<u16> {
    let days = date.num_days_from_ce() - EPOCH_DAY_NUMBER;
    if days < 0 {
        return Err(LicenseError::InvalidInput(format!(
            "activation date {date} is before 2020-01-01"
        )));
    }
    if days > i32::from(MAX_ACTIVATION_DAYS) {
        return Err(LicenseError::InvalidInput(format!(
            "activation date {date} is after 2070-01-01"
        )));
    }
    Ok(days as u16)
}

fn date_from_days(days: u16) -> LicenseResult<NaiveDate> {
    if days > MAX_ACTIVATION_DAYS {
        return Err(malformed(format!("activation day {days} out of range")));
    }
    NaiveDate::from_num_days_from_ce_opt(EPOCH_DAY_NUMBER + i32::from(days))
        .ok_or_else(|| malformed(format!("activation day {days} out of range")))
}
