//! Batch generator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LicenseError, LicenseResult};

/// Default maximum number of licenses per batch.
pub const DEFAULT_MAX_COUNT: usize = 100;

/// Upper limit accepted for `max_count`.
pub const MAX_COUNT_LIMIT: usize = 10_000;

/// Configuration for the batch generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Largest batch a single request may ask for.
    pub max_count: usize,
    /// Sign batch entries on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            parallel: true,
        }
    }
}

impl GeneratorConfig {
    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidInput`] if `max_count` is zero or above
    /// [`MAX_COUNT_LIMIT`].
    pub fn validate(&self) -> LicenseResult<()> {
        if self.max_count == 0 || self.max_count > MAX_COUNT_LIMIT {
            return Err(LicenseError::InvalidInput(format!(
                "max_count must be between 1 and {MAX_COUNT_LIMIT}"
            )));
        }
        Ok(())
    }
}
