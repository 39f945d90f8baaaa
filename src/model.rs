//! On-disk and in-memory data model — see spec §3.
//!
//! These are plain, serde-derived records. Nothing here performs I/O or
//! crypto; `storage.rs` serializes them, `crypto.rs` produces/consumes
//! [`EncryptedBlob`], `store.rs` operates on [`VaultDocument`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A secret name. Treated as an opaque, non-empty string.
pub type Key = String;

/// Arbitrary JSON-compatible metadata attached to a secret version.
///
/// A `BTreeMap` (rather than `HashMap`) keeps key order stable across
/// save/load round-trips, matching spec §6's "field ordering SHOULD be
/// stable" guidance.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Ciphertext + nonce pair produced by [`crate::crypto::encrypt`].
///
/// Both fields are base64 text on disk. The ciphertext includes the AEAD
/// authentication tag appended by the cipher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    pub ciphertext: String,
    pub nonce: String,
}

/// One historical snapshot of a secret's encrypted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretVersion {
    pub version: u32,
    pub encrypted_value: EncryptedBlob,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Lightweight view of a [`SecretVersion`] without its encrypted payload,
/// returned by [`crate::store::VersionStore::list_versions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

/// All versions ever stored for one key.
///
/// Invariants (enforced by `store.rs`, never by serde itself):
/// - `versions` is non-empty and sorted ascending by `version`.
/// - `current_version` is the highest version number ever assigned to this
///   key, even if that version was later deleted by `delete_version`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionedKey {
    pub versions: Vec<SecretVersion>,
    pub current_version: u32,
}

/// The whole vault as persisted on disk: key name -> version history.
///
/// A `BTreeMap` gives stable (alphabetical) key ordering on every save,
/// which keeps diffs small even though it isn't strictly insertion order
/// (see DESIGN.md's Open Question on this point).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultDocument(pub BTreeMap<Key, VersionedKey>);

impl VaultDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Operations recorded in the audit trail — spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Init,
    Get,
    Set,
    Delete,
    Rotate,
    ListVersions,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::Init => "INIT",
            Operation::Get => "GET",
            Operation::Set => "SET",
            Operation::Delete => "DELETE",
            Operation::Rotate => "ROTATE",
            Operation::ListVersions => "LIST_VERSIONS",
        };
        f.write_str(s)
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}
