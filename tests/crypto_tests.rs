// tests/crypto_tests.rs
//! Black-box tests against the public `secrets_vault::crypto` API.

use secrets_vault::crypto::{decrypt, encrypt, generate_key, key_to_string, string_to_key};
use secrets_vault::VaultError;

#[test]
fn encrypt_decrypt_round_trip_arbitrary_bytes() {
    let key = generate_key();
    for payload in [&b""[..], b"a", b"a long secret value with spaces and \0 bytes"] {
        let blob = encrypt(payload, key.expose_secret()).unwrap();
        assert_eq!(decrypt(&blob, key.expose_secret()).unwrap(), payload);
    }
}

#[test]
fn key_encoding_round_trips_through_base64() {
    let key = generate_key();
    let encoded = key_to_string(key.expose_secret());
    let decoded = string_to_key(&encoded).unwrap();
    assert_eq!(decoded.expose_secret(), key.expose_secret());
}

#[test]
fn string_to_key_rejects_wrong_length() {
    let err = string_to_key("c2hvcnQ=").unwrap_err(); // base64("short")
    assert!(matches!(err, VaultError::KeyLength(_)));
}
