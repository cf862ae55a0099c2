//! Issuer key material and signatures for Licensor.
//!
//! - Ed25519 key pairs for the license issuer
//! - Detached signatures over canonical payload bytes
//! - SHA-256 digests for checksums and fingerprints
//!
//! Private key bytes are zeroized when an [`IssuerKey`] is dropped.

mod error;
mod hash;
mod signing;

pub use error::{CryptoError, CryptoResult};
pub use hash::{sha256, DIGEST_SIZE};
pub use signing::{
    IssuerKey, KeyPair, PublicKey, Signature, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE,
};
