//! SHA-256 helpers shared by the key checksum and machine fingerprint.

use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Hashes a sequence of byte parts as one contiguous message.
#[must_use]
pub fn sha256(parts: &[&[u8]]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_hash_like_concatenation() {
        assert_eq!(sha256(&[b"ab", b"c"]), sha256(&[b"abc"]));
    }

    #[test]
    fn known_vector() {
        let digest = sha256(&[b"abc"]);
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
