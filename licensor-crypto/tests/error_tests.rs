use licensor_crypto::CryptoError;

#[test]
fn error_display_invalid_key_length() {
    let err = CryptoError::InvalidKeyLength {
        expected: 32,
        actual: 16,
    };
    let msg = format!("{err}");
    assert!(msg.contains("32"));
    assert!(msg.contains("16"));
}

#[test]
fn error_display_invalid_encoding() {
    let err = CryptoError::InvalidKeyEncoding("odd length".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid key encoding"));
    assert!(msg.contains("odd length"));
}

#[test]
fn error_display_invalid_public_key() {
    let err = CryptoError::InvalidPublicKey;
    assert!(format!("{err}").contains("public key"));
}

#[test]
fn error_display_signature_length() {
    let err = CryptoError::InvalidSignatureLength {
        expected: 64,
        actual: 3,
    };
    assert!(format!("{err}").contains("64"));
}

#[test]
fn error_is_debug() {
    let err = CryptoError::InvalidPublicKey;
    let _ = format!("{err:?}");
}
