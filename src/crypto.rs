//! Pure cryptographic primitives — no I/O, no document model.
//!
//! AES-256-GCM authenticated encryption over a raw 32-byte key, with
//! ciphertext and nonce base64-encoded for storage (spec §4.1). Grounded in
//! `other_examples/c30af044_jbgriesner-serdevault…vault.rs` and
//! `9ac5ae28_scrappyAI-Toka…lib.rs`, both of which build on the same
//! `aes_gcm::Aes256Gcm` + `OsRng` shape.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key as AesKey, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};

use crate::aliases::MasterKey;
use crate::consts::{MASTER_KEY_LEN, NONCE_LEN};
use crate::error::{Result, VaultError};
use crate::model::EncryptedBlob;

/// Generate a fresh, cryptographically random 256-bit master key.
pub fn generate_key() -> MasterKey {
    MasterKey::generate()
}

/// Encrypt `plaintext` under `key`, sampling a fresh random nonce.
///
/// Fails with [`VaultError::KeyLength`] if `key` is not exactly 32 bytes —
/// in practice this can only happen if a caller bypasses [`MasterKey`] and
/// hands us raw bytes directly, since `MasterKey` itself guarantees length.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<EncryptedBlob> {
    let cipher = cipher_for(key)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| VaultError::Authentication)?;

    Ok(EncryptedBlob {
        ciphertext: STANDARD.encode(ciphertext),
        nonce: STANDARD.encode(nonce_bytes),
    })
}

/// Decrypt `blob` under `key`.
///
/// Wrong key, tampering, and corruption are all surfaced as the same
/// [`VaultError::Authentication`] to avoid giving callers an oracle that
/// distinguishes them, per spec §4.1.
pub fn decrypt(blob: &EncryptedBlob, key: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher_for(key)?;

    let ciphertext = STANDARD
        .decode(&blob.ciphertext)
        .map_err(|e| VaultError::MalformedBlob(format!("invalid base64 ciphertext: {e}")))?;
    let nonce_bytes = STANDARD
        .decode(&blob.nonce)
        .map_err(|e| VaultError::MalformedBlob(format!("invalid base64 nonce: {e}")))?;
    if nonce_bytes.len() != 12 {
        return Err(VaultError::MalformedBlob(format!(
            "nonce must be 12 bytes, got {}",
            nonce_bytes.len()
        )));
    }
    let nonce = Nonce::from_slice(&nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext.as_slice())
        .map_err(|_| VaultError::Authentication)
}

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != MASTER_KEY_LEN {
        return Err(VaultError::KeyLength(key.len()));
    }
    let key = AesKey::<Aes256Gcm>::from_slice(key);
    Ok(Aes256Gcm::new(key))
}

/// Base64-encode a master key for display or for `VAULT_MASTER_KEY`.
pub fn key_to_string(key: &[u8]) -> String {
    STANDARD.encode(key)
}

/// Decode a base64-encoded master key (e.g. from `VAULT_MASTER_KEY`).
pub fn string_to_key(s: &str) -> Result<MasterKey> {
    let bytes = STANDARD
        .decode(s.trim())
        .map_err(|e| VaultError::MalformedBlob(format!("invalid base64 key: {e}")))?;
    MasterKey::from_bytes(&bytes)
}
