//! Ed25519 signing and verification for license payloads.
//!
//! The issuer key only exists inside the generation tool. It zeroizes its
//! secret bytes on drop and never prints them through `Debug`.

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey,
    VerifyingKey as DalekVerifyingKey,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Size of an Ed25519 secret key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Issuer private key. Used to sign license payloads.
pub struct IssuerKey(DalekSigningKey);

/// Issuer public key. Embedded in the verifying application.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(DalekVerifyingKey);

/// Detached Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

/// A freshly generated issuer key pair.
pub struct KeyPair {
    pub issuer_key: IssuerKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random key pair from the OS entropy source.
    pub fn generate() -> Self {
        let signing = DalekSigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Self {
            issuer_key: IssuerKey(signing),
            public_key: PublicKey(verifying),
        }
    }
}

impl IssuerKey {
    /// Creates an issuer key from the raw 32-byte secret.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self(DalekSigningKey::from_bytes(bytes))
    }

    /// Parses an issuer key from hex text, as written by `to_hex`.
    ///
    /// Surrounding whitespace is ignored. Intermediate buffers are zeroized.
    pub fn from_hex(text: &str) -> CryptoResult<Self> {
        let decoded = Zeroizing::new(
            hex::decode(text.trim())
                .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?,
        );
        if decoded.len() != SECRET_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_SIZE,
                actual: decoded.len(),
            });
        }
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_bytes(&bytes))
    }

    /// Returns the secret key as hex text.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0.to_bytes()))
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message).to_bytes())
    }

    /// Returns the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }
}

impl std::fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl PublicKey {
    /// Creates a public key from raw bytes.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> CryptoResult<Self> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Parses a public key from hex text.
    pub fn from_hex(text: &str) -> CryptoResult<Self> {
        let decoded =
            hex::decode(text.trim()).map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_SIZE,
                    actual: decoded.len(),
                })?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw public key bytes.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Returns the public key as hex text.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// Checks a signature over a message.
    ///
    /// Any mismatch, including a signature that does not decode, is `false`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let signature = DalekSignature::from_bytes(&signature.0);
        self.0.verify_strict(message, &signature).is_ok()
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

impl Signature {
    /// Creates a signature from the raw 64-byte value.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_SIZE]) -> Self {
        Self(*bytes)
    }

    /// Creates a signature from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SIGNATURE_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureLength {
                    expected: SIGNATURE_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Returns the raw 64-byte signature.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signature").field(&hex::encode(self.0)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = KeyPair::generate();
        let sig = kp.issuer_key.sign(b"hello world");
        assert!(kp.public_key.verify(b"hello world", &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = KeyPair::generate();
        let sig = kp.issuer_key.sign(b"correct");
        assert!(!kp.public_key.verify(b"wrong", &sig));
    }

    #[test]
    fn truncated_message_fails() {
        let kp = KeyPair::generate();
        let sig = kp.issuer_key.sign(b"payload bytes");
        assert!(!kp.public_key.verify(b"payload byte", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();
        let sig = kp1.issuer_key.sign(b"message");
        assert!(!kp2.public_key.verify(b"message", &sig));
    }

    #[test]
    fn garbage_signature_is_false_not_panic() {
        let kp = KeyPair::generate();
        let sig = Signature::from_bytes(&[0xFF; SIGNATURE_SIZE]);
        assert!(!kp.public_key.verify(b"message", &sig));
    }

    #[test]
    fn signing_is_deterministic() {
        let key = IssuerKey::from_bytes(&[7u8; SECRET_KEY_SIZE]);
        assert_eq!(key.sign(b"same"), key.sign(b"same"));
    }

    #[test]
    fn hex_roundtrip() {
        let kp = KeyPair::generate();
        let secret = kp.issuer_key.to_hex();
        let restored = IssuerKey::from_hex(&secret).unwrap();
        assert_eq!(restored.public_key(), kp.public_key);

        let public = PublicKey::from_hex(&kp.public_key.to_hex()).unwrap();
        assert_eq!(public, kp.public_key);
    }

    #[test]
    fn debug_redacts_secret() {
        let key = IssuerKey::from_bytes(&[9u8; SECRET_KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("0909"));
    }
}
