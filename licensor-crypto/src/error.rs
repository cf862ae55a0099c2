//! Error types for issuer key handling.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while loading or using key material.
///
/// Signature mismatches are not errors: verification reports them as `false`.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key bytes had the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key text could not be decoded.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Public key bytes are not a valid Ed25519 point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature bytes had the wrong length.
    #[error("invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },
}
