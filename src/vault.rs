//! The public facade — spec §4.5.
//!
//! Resolves the master key, owns a [`Storage`], [`VersionStore`] and
//! [`AuditLog`], and wraps every public operation with exactly one audit
//! entry. Grounded in the teacher's `vault.rs` (constructor resolving
//! config/keys before doing any work, each public method logging) and
//! `other_examples/84f86ff1_whynaidu-envvault…store.rs`'s thin facade shape.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::aliases::MasterKey;
use crate::audit::AuditLog;
use crate::config;
use crate::consts::{ENV_MASTER_KEY, ENV_MASTER_KEY_FILE, ENV_VAULT_FILE};
use crate::crypto;
use crate::error::{Result, VaultError};
use crate::model::{Key, Metadata, Operation, VersionInfo};
use crate::rotation;
use crate::storage::Storage;
use crate::store::VersionStore;

#[cfg(feature = "logging")]
use tracing::warn;

/// Inputs accepted by [`Vault::new`]. All fields are optional; omitted
/// fields fall back to environment variables, then built-in defaults.
#[derive(Default)]
pub struct VaultOptions {
    pub master_key: Option<Vec<u8>>,
    pub key_file: Option<PathBuf>,
    pub vault_file: Option<PathBuf>,
    pub audit_file: Option<PathBuf>,
    pub auto_save: Option<bool>,
}

/// The local, file-backed secrets vault.
pub struct Vault {
    master_key: MasterKey,
    storage: Storage,
    store: VersionStore,
    audit: AuditLog,
    auto_save: bool,
}

impl Vault {
    /// Open (or initialize) a vault per `opts`. See spec §4.5 for the
    /// master-key resolution order.
    pub fn new(opts: VaultOptions) -> Result<Self> {
        let cfg = config::load();

        let master_key = resolve_master_key(opts.master_key.as_deref(), opts.key_file.as_deref(), cfg)?;

        let vault_file = opts
            .vault_file
            .or_else(|| std::env::var(ENV_VAULT_FILE).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(&cfg.paths.vault_file));

        let audit_file = opts
            .audit_file
            .unwrap_or_else(|| vault_file.with_extension("audit.jsonl"));

        let auto_save = opts.auto_save.unwrap_or(cfg.behavior.auto_save);

        let storage = Storage::new(vault_file).with_backup_on_save(cfg.behavior.backup_on_save);
        let mut audit = AuditLog::new(audit_file)?;

        let doc = match storage.load() {
            Ok(doc) => doc,
            Err(err) => {
                #[cfg(feature = "logging")]
                warn!(error = %err, "vault file failed to load, starting from an empty document");
                let mut metadata = Metadata::new();
                metadata.insert(
                    "warning".to_string(),
                    serde_json::Value::String(format!("load failed, starting empty: {err}")),
                );
                let _ = audit.record(Operation::Init, None, false, Some(err.to_string()), metadata);
                crate::model::VaultDocument::new()
            }
        };
        let store = VersionStore::new(doc);

        let _ = audit.record(Operation::Init, None, true, None, Metadata::new());

        Ok(Self {
            master_key,
            storage,
            store,
            audit,
            auto_save,
        })
    }

    /// Encrypt `plaintext` under the live master key, append a new version
    /// for `key`, and (if `auto_save`) persist. Returns the new version
    /// number.
    pub fn set(&mut self, key: &str, plaintext: &[u8], metadata: Option<Metadata>) -> Result<u32> {
        let result = self.do_set(key, plaintext, metadata.unwrap_or_default());
        self.audit_result(Operation::Set, Some(key.to_string()), &result, |_| Metadata::new());
        result
    }

    fn do_set(&mut self, key: &str, plaintext: &[u8], metadata: Metadata) -> Result<u32> {
        let blob = crypto::encrypt(plaintext, self.master_key.expose_secret())?;
        let version = self.store.add_version(key, blob, metadata);
        if self.auto_save {
            self.persist()?;
        }
        Ok(version)
    }

    /// Decrypt and return the value for `key` (the latest surviving version,
    /// or a specific one).
    pub fn get(&mut self, key: &str, version: Option<u32>) -> Result<Vec<u8>> {
        let result = self.do_get(key, version);
        self.audit_result(Operation::Get, Some(key.to_string()), &result, |_| Metadata::new());
        result
    }

    fn do_get(&self, key: &str, version: Option<u32>) -> Result<Vec<u8>> {
        let sv = self.store.get_version(key, version)?;
        crypto::decrypt(&sv.encrypted_value, self.master_key.expose_secret())
    }

    /// Remove `key` and its entire version history. Returns `true` iff the
    /// key existed — deleting an already-absent key is a successful no-op
    /// that returns `false`, not an error (spec §4.5).
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let result = self.do_delete(key);
        self.audit_result(Operation::Delete, Some(key.to_string()), &result, |_| Metadata::new());
        result
    }

    fn do_delete(&mut self, key: &str) -> Result<bool> {
        let existed = self.store.delete_key(key);
        if existed && self.auto_save {
            self.persist()?;
        }
        Ok(existed)
    }

    /// Rotate the live master key. Generates a fresh one if `new_key` is
    /// `None`. Returns the new key's raw bytes — the caller owns writing it
    /// to a key file; the vault never does so itself (spec §4.5).
    pub fn rotate(&mut self, new_key: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let result = self.do_rotate(new_key);
        let count = result.as_ref().ok().map(|_| self.store.keys().len()).unwrap_or(0);
        self.audit_result(Operation::Rotate, None, &result, |_| {
            let mut m = Metadata::new();
            m.insert("secret_count".to_string(), serde_json::Value::from(count));
            m
        });
        result
    }

    fn do_rotate(&mut self, new_key: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let new_master = match new_key {
            Some(bytes) => MasterKey::from_bytes(&bytes)?,
            None => crypto::generate_key(),
        };

        let (rotated_doc, _count) = rotation::rotate(
            self.store.document(),
            self.master_key.expose_secret(),
            new_master.expose_secret(),
        )?;

        self.store = VersionStore::new(rotated_doc);
        self.master_key = new_master.clone();
        self.persist()?;

        Ok(new_master.expose_secret().to_vec())
    }

    /// Version history (without payloads) for `key`, ascending. Empty if
    /// `key` is absent — not an error (spec §4.3).
    pub fn list_versions(&mut self, key: &str) -> Vec<VersionInfo> {
        let result = self.store.list_versions(key);
        let _ = self
            .audit
            .record(Operation::ListVersions, Some(key.to_string()), true, None, Metadata::new());
        result
    }

    /// All secret names currently in the vault.
    pub fn list_keys(&self) -> Vec<Key> {
        self.store.keys()
    }

    /// Query the audit trail, most-recent-first.
    pub fn get_audit_log(&self, key: Option<&str>, limit: Option<usize>) -> Vec<crate::model::AuditEntry> {
        self.audit.query(key, None, limit).into_iter().cloned().collect()
    }

    /// Erase the entire audit trail, in memory and on disk. Spec §9 keeps
    /// this as the only retention knob the core exposes; there is no
    /// automatic retention policy.
    pub fn clear_logs(&mut self) -> Result<()> {
        self.audit.clear_logs()
    }

    /// Export the full audit trail as pretty JSON, most-recent-first.
    #[cfg(feature = "cli")]
    pub fn export_audit_log_json(&self, dest: impl AsRef<Path>) -> Result<()> {
        self.audit.export_json(dest)
    }

    /// Export the full audit trail as CSV, most-recent-first.
    #[cfg(feature = "cli")]
    pub fn export_audit_log_csv(&self, dest: impl AsRef<Path>) -> Result<()> {
        self.audit.export_csv(dest)
    }

    /// Explicitly persist the in-memory document, regardless of `auto_save`.
    pub fn save(&self) -> Result<()> {
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(self.store.document())
    }

    fn audit_result<T, F>(&mut self, op: Operation, key: Option<Key>, result: &Result<T>, metadata: F)
    where
        F: FnOnce(&Result<T>) -> Metadata,
    {
        let (success, error) = match result {
            Ok(_) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        };
        let meta = metadata(result);
        let _ = self.audit.record(op, key, success, error, meta);
    }
}

fn resolve_master_key(
    direct: Option<&[u8]>,
    key_file: Option<&Path>,
    cfg: &config::Config,
) -> Result<MasterKey> {
    let mut tried = Vec::new();

    if let Some(bytes) = direct {
        return MasterKey::from_bytes(bytes);
    }
    tried.push("direct bytes".to_string());

    if let Ok(encoded) = std::env::var(ENV_MASTER_KEY) {
        if let Ok(bytes) = STANDARD.decode(encoded.trim()) {
            if let Ok(key) = MasterKey::from_bytes(&bytes) {
                return Ok(key);
            }
        }
    }
    tried.push(format!("${ENV_MASTER_KEY}"));

    if let Some(path) = key_file {
        if path.is_file() {
            let bytes = std::fs::read(path)
                .map_err(|e| VaultError::MasterKeyNotFound(format!("failed to read key file {}: {e}", path.display())))?;
            return MasterKey::from_bytes(&bytes);
        }
    }
    tried.push("explicit key file".to_string());

    let env_key_file = std::env::var(ENV_MASTER_KEY_FILE).ok().map(PathBuf::from);
    let default_path = env_key_file.unwrap_or_else(|| cfg.default_key_file_path());
    if default_path.is_file() {
        if let Ok(bytes) = std::fs::read(&default_path) {
            if let Ok(key) = MasterKey::from_bytes(&bytes) {
                return Ok(key);
            }
        }
    }
    tried.push(format!("default key file ({})", default_path.display()));

    Err(VaultError::MasterKeyNotFound(format!(
        "no master key found; tried: {}",
        tried.join(", ")
    )))
}
