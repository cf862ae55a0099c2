//! Machine identifiers and their normalization.

use serde::{Deserialize, Serialize};

use crate::error::{LicenseError, LicenseResult};

/// Minimum length of a machine id after normalization.
pub const MIN_MACHINE_ID_LEN: usize = 8;

/// Maximum length of a machine id; also its fixed width in the payload.
pub const MAX_MACHINE_ID_LEN: usize = 64;

/// A validated, normalized machine identifier.
///
/// Normalization trims surrounding whitespace and upper-cases ASCII letters.
/// Accepted characters are `A-Z`, `0-9`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineId(String);

impl MachineId {
    /// Normalizes and validates a raw machine id.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidInput`] if the id is shorter than
    /// [`MIN_MACHINE_ID_LEN`], longer than [`MAX_MACHINE_ID_LEN`], or contains
    /// characters outside the accepted alphabet.
    pub fn parse(raw: &str) -> LicenseResult<Self> {
        let normalized = normalize(raw);

        if normalized.is_empty() {
            return Err(LicenseError::InvalidInput(
                "machine id is required".to_string(),
            ));
        }
        if normalized.len() < MIN_MACHINE_ID_LEN {
            return Err(LicenseError::InvalidInput(format!(
                "machine id must be at least {MIN_MACHINE_ID_LEN} characters"
            )));
        }
        if normalized.len() > MAX_MACHINE_ID_LEN {
            return Err(LicenseError::InvalidInput(format!(
                "machine id must be at most {MAX_MACHINE_ID_LEN} characters"
            )));
        }
        if let Some(bad) = normalized.bytes().find(|b| !is_machine_id_byte(*b)) {
            return Err(LicenseError::InvalidInput(format!(
                "machine id contains unsupported character {:?}",
                char::from(bad)
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `raw` normalizes to this id.
    ///
    /// `raw` is not validated; anything that does not normalize to the
    /// exact same string simply does not match.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        normalize(raw) == self.0
    }
}

impl std::fmt::Display for MachineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MachineId {
    type Error = LicenseError;

    fn try_from(value: String) -> LicenseResult<Self> {
        Self::parse(&value)
    }
}

impl From<MachineId> for String {
    fn from(id: MachineId) -> Self {
        id.0
    }
}

/// Applies the normalization shared by issuing and verifying sides.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Returns true for bytes allowed in a normalized machine id.
pub(crate) fn is_machine_id_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let id = MachineId::parse("  abc12345 \n").unwrap();
        assert_eq!(id.as_str(), "ABC12345");
    }

    #[test]
    fn rejects_short() {
        assert!(MachineId::parse("ABC1234").is_err());
        assert!(MachineId::parse("   ").is_err());
    }

    #[test]
    fn accepts_bounds() {
        assert!(MachineId::parse("ABCDEFGH").is_ok());
        assert!(MachineId::parse(&"A".repeat(MAX_MACHINE_ID_LEN)).is_ok());
        assert!(MachineId::parse(&"A".repeat(MAX_MACHINE_ID_LEN + 1)).is_err());
    }

    #[test]
    fn rejects_multibyte() {
        assert!(MachineId::parse("ABC12345é").is_err());
        assert!(MachineId::parse("ABC 12345").is_err());
    }

    #[test]
    fn matches_applies_same_normalization() {
        let id = MachineId::parse("ABC12345").unwrap();
        assert!(id.matches(" abc12345"));
        assert!(!id.matches("ABC123456"));
    }
}
