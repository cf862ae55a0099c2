//! Batch license generation.
//!
//! Each record is encoded, signed and formatted independently, so batches
//! run on the rayon pool with the issuer key as the only shared state.

use chrono::{NaiveDate, Utc};
use licensor_crypto::IssuerKey;
use rand::RngCore;
use rand::rngs::OsRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::format::format_key;
use crate::machine::MachineId;
use crate::payload::{LicensePayload, LicenseTier};
use crate::record::{LicenseDetails, LicenseRecord};

/// Issues batches of licenses with one issuer key.
pub struct BatchGenerator<'k> {
    key: &'k IssuerKey,
    config: GeneratorConfig,
}

impl<'k> BatchGenerator<'k> {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidInput`] if the configuration is invalid.
    pub fn new(key: &'k IssuerKey, config: GeneratorConfig) -> LicenseResult<Self> {
        config.validate()?;
        Ok(Self { key, config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates `count` licenses. A missing activation date means today (UTC).
    ///
    /// Records come back in request order and carry distinct nonces.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidInput`] for a bad machine id, a count
    /// outside `1..=max_count`, or an activation date outside the encodable
    /// range. No signing happens in those cases.
    pub fn generate(
        &self,
        tier: LicenseTier,
        machine_id: &str,
        activation_date: Option<NaiveDate>,
        count: usize,
    ) -> LicenseResult<Vec<LicenseRecord>> {
        let today = Utc::now().date_naive();
        self.generate_with_base(
            tier,
            machine_id,
            activation_date.unwrap_or(today),
            count,
            OsRng.next_u32(),
        )
    }

    fn generate_with_base(
        &self,
        tier: LicenseTier,
        machine_id: &str,
        activation_date: NaiveDate,
        count: usize,
        nonce_base: u32,
    ) -> LicenseResult<Vec<LicenseRecord>> {
        let machine_id = MachineId::parse(machine_id)?;
        if count == 0 || count > self.config.max_count {
            return Err(LicenseError::InvalidInput(format!(
                "count must be between 1 and {}",
                self.config.max_count
            )));
        }
        let template = LicensePayload::new(tier, machine_id, activation_date, nonce_base)?;

        debug!(%tier, count, %activation_date, "generating license batch");

        // count <= MAX_COUNT_LIMIT, so wrapping offsets stay distinct.
        let issue = |index: usize| {
            self.issue(&template.with_nonce(nonce_base.wrapping_add(index as u32)))
        };
        let records: Vec<LicenseRecord> = if self.config.parallel && count > 1 {
            (0..count).into_par_iter().map(issue).collect()
        } else {
            (0..count).map(issue).collect()
        };

        info!(%tier, count = records.len(), "license batch generated");
        Ok(records)
    }

    fn issue(&self, payload: &LicensePayload) -> LicenseRecord {
        let bytes = payload.encode();
        let signature = self.key.sign(&bytes);
        LicenseRecord {
            license_key: format_key(&bytes, &signature.to_bytes()),
            details: LicenseDetails::from(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> IssuerKey {
        IssuerKey::from_bytes(&[3u8; 32])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn nonces_wrap_without_colliding() {
        let key = key();
        let generator = BatchGenerator::new(&key, GeneratorConfig::default()).unwrap();
        let records = generator
            .generate_with_base(LicenseTier::Monthly, "ABC12345", date(2025, 1, 1), 4, u32::MAX - 1)
            .unwrap();
        let mut keys: Vec<&str> = records.iter().map(|r| r.license_key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let key = key();
        let parallel = BatchGenerator::new(&key, GeneratorConfig::default()).unwrap();
        let sequential = BatchGenerator::new(
            &key,
            GeneratorConfig {
                parallel: false,
                ..Default::default()
            },
        )
        .unwrap();

        let a = parallel
            .generate_with_base(LicenseTier::Yearly, "ABC12345", date(2025, 1, 1), 10, 42)
            .unwrap();
        let b = sequential
            .generate_with_base(LicenseTier::Yearly, "ABC12345", date(2025, 1, 1), 10, 42)
            .unwrap();
        assert_eq!(a, b);
    }
}
