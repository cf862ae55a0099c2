//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use licensor_crypto::{IssuerKey, PublicKey};
use licensor_license::{BatchGenerator, GeneratorConfig, LicenseRecord, LicenseTier, Verifier};

/// Returns a deterministic issuer key from a fixed seed.
pub fn test_issuer() -> IssuerKey {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    IssuerKey::from_bytes(&seed)
}

/// Returns the public half of [`test_issuer`].
pub fn test_public_key() -> PublicKey {
    test_issuer().public_key()
}

/// Returns a verifier for [`test_issuer`].
pub fn test_verifier() -> Verifier {
    Verifier::with_key(test_public_key())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Issues `count` licenses with the test issuer.
pub fn issue(
    tier: LicenseTier,
    machine_id: &str,
    activation: NaiveDate,
    count: usize,
) -> Vec<LicenseRecord> {
    let key = test_issuer();
    BatchGenerator::new(&key, GeneratorConfig::default())
        .unwrap()
        .generate(tier, machine_id, Some(activation), count)
        .unwrap()
}

/// Issues a single license with the test issuer.
pub fn issue_one(tier: LicenseTier, machine_id: &str, activation: NaiveDate) -> String {
    issue(tier, machine_id, activation, 1).remove(0).license_key
}

/// Replaces the symbol at `index` with a different alphabet symbol.
pub fn mutate_symbol(key: &str, index: usize) -> String {
    let mut chars: Vec<char> = key.chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
