use std::fs;

use licensor_cli::{load_config, load_issuer_key, public_key_constant, write_issuer_key};
use licensor_crypto::{IssuerKey, KeyPair};

fn seed_key() -> IssuerKey {
    IssuerKey::from_bytes(&[9u8; 32])
}

// ── Issuer key files ─────────────────────────────────────────────

#[test]
fn key_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.key");

    let pair = KeyPair::generate();
    write_issuer_key(&path, &pair.issuer_key).unwrap();

    let loaded = load_issuer_key(&path).unwrap();
    assert_eq!(loaded.public_key(), pair.public_key);
}

#[test]
fn key_file_is_hex_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.key");
    write_issuer_key(&path, &seed_key()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim(), "09".repeat(32));
}

#[test]
fn refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.key");
    fs::write(&path, "keep me").unwrap();

    let err = write_issuer_key(&path, &seed_key()).unwrap_err();
    assert!(err.to_string().contains("Refusing to overwrite"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
}

#[cfg(unix)]
#[test]
fn key_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.key");
    write_issuer_key(&path, &seed_key()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn missing_key_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_issuer_key(&dir.path().join("absent.key")).is_err());
}

#[test]
fn malformed_key_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issuer.key");
    fs::write(&path, "not hex at all").unwrap();
    assert!(load_issuer_key(&path).is_err());

    fs::write(&path, "abcd").unwrap();
    assert!(load_issuer_key(&path).is_err());
}

// ── Generator config ─────────────────────────────────────────────

#[test]
fn config_defaults_without_file() {
    let config = load_config(None).unwrap();
    assert_eq!(config.max_count, 100);
    assert!(config.parallel);
}

#[test]
fn config_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licensor.toml");
    fs::write(&path, "max_count = 500\nparallel = false\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.max_count, 500);
    assert!(!config.parallel);
}

#[test]
fn config_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licensor.toml");
    fs::write(&path, "max_cont = 5\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn config_rejects_zero_max_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("licensor.toml");
    fs::write(&path, "max_count = 0\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}

// ── Output ───────────────────────────────────────────────────────

#[test]
fn public_key_constant_lists_32_bytes() {
    let constant = public_key_constant(&seed_key().public_key());
    assert!(constant.starts_with("pub const LICENSE_PUBLIC_KEY: [u8; 32] = ["));
    assert!(constant.ends_with("];"));
    assert_eq!(constant.matches(", ").count(), 31);
}
