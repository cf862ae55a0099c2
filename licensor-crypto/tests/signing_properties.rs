//! Property-based tests for issuer signatures.
//!
//! - A signature verifies for the exact message it was made over
//! - Any single-byte change to the message or signature fails verification
//! - Signatures from one key never verify under another

use licensor_crypto::{IssuerKey, Signature, SIGNATURE_SIZE};
use proptest::prelude::*;

fn issuer_strategy() -> impl Strategy<Value = IssuerKey> {
    prop::array::uniform32(any::<u8>()).prop_map(|seed| IssuerKey::from_bytes(&seed))
}

fn message_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..256)
}

proptest! {
    #[test]
    fn signature_verifies_for_original_message(
        key in issuer_strategy(),
        message in message_strategy(),
    ) {
        let sig = key.sign(&message);
        prop_assert!(key.public_key().verify(&message, &sig));
    }

    #[test]
    fn flipped_message_byte_fails(
        key in issuer_strategy(),
        message in message_strategy(),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let sig = key.sign(&message);
        let mut tampered = message.clone();
        let i = index.index(tampered.len());
        tampered[i] ^= mask;
        prop_assert!(!key.public_key().verify(&tampered, &sig));
    }

    #[test]
    fn flipped_signature_byte_fails(
        key in issuer_strategy(),
        message in message_strategy(),
        index in 0..SIGNATURE_SIZE,
        mask in 1u8..=255,
    ) {
        let mut bytes = key.sign(&message).to_bytes();
        bytes[index] ^= mask;
        let tampered = Signature::from_bytes(&bytes);
        prop_assert!(!key.public_key().verify(&message, &tampered));
    }

    #[test]
    fn other_key_rejects(
        key_a in issuer_strategy(),
        key_b in issuer_strategy(),
        message in message_strategy(),
    ) {
        prop_assume!(key_a.public_key() != key_b.public_key());
        let sig = key_a.sign(&message);
        prop_assert!(!key_b.public_key().verify(&message, &sig));
    }
}
