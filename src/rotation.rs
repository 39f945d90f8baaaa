//! All-or-nothing master-key rotation — spec §4.4.
//!
//! The original this spec was distilled from (`versioning.py`'s
//! `rotate_key`) catches decryption failures per version and `continue`s,
//! silently leaving a mixed-key document behind. Spec §9 calls this out as a
//! bug to fix, not replicate: this implementation validates the old key up
//! front, builds the entire re-encrypted document in memory, and only ever
//! returns a fully-converted document or an error — never a partial one.

use crate::crypto;
use crate::error::{Result, VaultError};
use crate::model::{SecretVersion, VaultDocument, VersionedKey};

/// Re-encrypt every version of every secret in `doc` from `old_key` to
/// `new_key`. Returns the new document and the number of secrets rotated.
/// On any failure, `doc` in the caller's hands is untouched because nothing
/// is mutated in place.
pub fn rotate(doc: &VaultDocument, old_key: &[u8], new_key: &[u8]) -> Result<(VaultDocument, usize)> {
    if doc.0.is_empty() {
        return Ok((VaultDocument::new(), 0));
    }

    // Validate the old key against the first available ciphertext before
    // doing any work, so a wrong key fails fast with a clear error instead
    // of partway through re-encryption.
    if let Some(first) = doc.0.values().find_map(|vk| vk.versions.first()) {
        crypto::decrypt(&first.encrypted_value, old_key).map_err(|_| {
            VaultError::Rotation("old master key failed to decrypt existing secrets".to_string())
        })?;
    }

    let mut rotated = VaultDocument::new();
    for (key, versioned) in doc.0.iter() {
        let mut new_versions = Vec::with_capacity(versioned.versions.len());
        for sv in &versioned.versions {
            let plaintext = crypto::decrypt(&sv.encrypted_value, old_key).map_err(|_| {
                VaultError::Rotation(format!(
                    "failed to decrypt '{key}' version {} under old key",
                    sv.version
                ))
            })?;
            let encrypted_value = crypto::encrypt(&plaintext, new_key)
                .map_err(|e| VaultError::Rotation(format!("failed to re-encrypt '{key}': {e}")))?;
            new_versions.push(SecretVersion {
                version: sv.version,
                encrypted_value,
                timestamp: sv.timestamp,
                metadata: sv.metadata.clone(),
            });
        }
        rotated.0.insert(
            key.clone(),
            VersionedKey {
                versions: new_versions,
                current_version: versioned.current_version,
            },
        );
    }

    let count = rotated.0.len();
    Ok((rotated, count))
}
