//! In-memory version-history operations over a [`VaultDocument`] — spec §4.3.
//!
//! Pure data manipulation; callers (`vault.rs`) decide when to persist via
//! `storage.rs`. Grounded in `other_examples/84f86ff1_whynaidu-envvault…
//! store.rs`'s `HashMap<String, Secret>` facade, generalized to a full
//! version history per key rather than one current value.

use chrono::Utc;

use crate::error::{Result, VaultError};
use crate::model::{EncryptedBlob, Key, Metadata, SecretVersion, VaultDocument, VersionInfo, VersionedKey};

/// Operates on an owned [`VaultDocument`], tracking version history.
pub struct VersionStore {
    doc: VaultDocument,
}

impl VersionStore {
    pub fn new(doc: VaultDocument) -> Self {
        Self { doc }
    }

    pub fn into_document(self) -> VaultDocument {
        self.doc
    }

    pub fn document(&self) -> &VaultDocument {
        &self.doc
    }

    /// Append a new version for `key`, bumping `current_version`.
    ///
    /// `current_version` is the highest version number this key has ever
    /// reached and never decrements, even if that version is later deleted
    /// (spec §4.3 invariant).
    pub fn add_version(&mut self, key: &str, encrypted_value: EncryptedBlob, metadata: Metadata) -> u32 {
        let entry = self.doc.0.entry(key.to_string()).or_insert_with(VersionedKey::default);
        let next_version = entry.current_version + 1;
        entry.versions.push(SecretVersion {
            version: next_version,
            encrypted_value,
            timestamp: Utc::now(),
            metadata,
        });
        entry.current_version = next_version;
        next_version
    }

    /// Fetch a specific version's encrypted payload. `version: None` means
    /// "the most recent surviving version" (which may not equal
    /// `current_version` if that exact version was deleted).
    pub fn get_version(&self, key: &str, version: Option<u32>) -> Result<&SecretVersion> {
        let entry = self
            .doc
            .0
            .get(key)
            .ok_or_else(|| VaultError::SecretNotFound { key: key.to_string(), version })?;

        match version {
            Some(v) => entry
                .versions
                .iter()
                .find(|sv| sv.version == v)
                .ok_or(VaultError::SecretNotFound { key: key.to_string(), version: Some(v) }),
            None => entry
                .versions
                .last()
                .ok_or(VaultError::SecretNotFound { key: key.to_string(), version: None }),
        }
    }

    /// List version metadata (newest last) for `key`, without payloads.
    /// Empty if `key` is absent (spec §4.3) — this is not an error.
    pub fn list_versions(&self, key: &str) -> Vec<VersionInfo> {
        match self.doc.0.get(key) {
            Some(entry) => entry
                .versions
                .iter()
                .map(|sv| VersionInfo {
                    version: sv.version,
                    timestamp: sv.timestamp,
                    metadata: sv.metadata.clone(),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Remove `key` and its entire version history. Returns `true` iff the
    /// key existed — a missing key is a no-op success, not an error (spec
    /// §4.3).
    pub fn delete_key(&mut self, key: &str) -> bool {
        self.doc.0.remove(key).is_some()
    }

    /// Remove one specific version of `key`, leaving `current_version`
    /// untouched. Deleting the last remaining version removes the key
    /// entirely.
    pub fn delete_version(&mut self, key: &str, version: u32) -> Result<()> {
        let entry = self
            .doc
            .0
            .get_mut(key)
            .ok_or_else(|| VaultError::SecretNotFound { key: key.to_string(), version: Some(version) })?;

        let before = entry.versions.len();
        entry.versions.retain(|sv| sv.version != version);
        if entry.versions.len() == before {
            return Err(VaultError::SecretNotFound { key: key.to_string(), version: Some(version) });
        }
        if entry.versions.is_empty() {
            self.doc.0.remove(key);
        }
        Ok(())
    }

    /// All secret names currently in the store, alphabetically.
    pub fn keys(&self) -> Vec<Key> {
        self.doc.0.keys().cloned().collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.doc.0.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(tag: &str) -> EncryptedBlob {
        EncryptedBlob { ciphertext: tag.to_string(), nonce: "n".to_string() }
    }

    #[test]
    fn add_version_starts_at_one() {
        let mut store = VersionStore::new(VaultDocument::new());
        let v = store.add_version("k", blob("a"), Metadata::new());
        assert_eq!(v, 1);
    }

    #[test]
    fn current_version_never_decrements_after_delete_version() {
        let mut store = VersionStore::new(VaultDocument::new());
        store.add_version("k", blob("a"), Metadata::new());
        store.add_version("k", blob("b"), Metadata::new());
        store.add_version("k", blob("c"), Metadata::new());

        store.delete_version("k", 3).unwrap();
        assert_eq!(store.document().0["k"].current_version, 3);

        let next = store.add_version("k", blob("d"), Metadata::new());
        assert_eq!(next, 4);
    }

    #[test]
    fn get_version_none_returns_latest_surviving() {
        let mut store = VersionStore::new(VaultDocument::new());
        store.add_version("k", blob("a"), Metadata::new());
        store.add_version("k", blob("b"), Metadata::new());
        store.delete_version("k", 2).unwrap();

        let sv = store.get_version("k", None).unwrap();
        assert_eq!(sv.version, 1);
    }

    #[test]
    fn deleting_last_version_removes_key() {
        let mut store = VersionStore::new(VaultDocument::new());
        store.add_version("k", blob("a"), Metadata::new());
        store.delete_version("k", 1).unwrap();
        assert!(!store.contains_key("k"));
    }

    #[test]
    fn delete_key_missing_is_a_no_op_false() {
        let mut store = VersionStore::new(VaultDocument::new());
        assert!(!store.delete_key("missing"));
    }

    #[test]
    fn delete_key_existing_returns_true() {
        let mut store = VersionStore::new(VaultDocument::new());
        store.add_version("k", blob("a"), Metadata::new());
        assert!(store.delete_key("k"));
        assert!(!store.delete_key("k"));
    }

    #[test]
    fn list_versions_is_ascending() {
        let mut store = VersionStore::new(VaultDocument::new());
        store.add_version("k", blob("a"), Metadata::new());
        store.add_version("k", blob("b"), Metadata::new());
        let infos = store.list_versions("k");
        assert_eq!(infos.iter().map(|v| v.version).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn list_versions_missing_key_is_empty_not_an_error() {
        let store = VersionStore::new(VaultDocument::new());
        assert!(store.list_versions("missing").is_empty());
    }
}
