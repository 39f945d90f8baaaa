//! Durable, atomic persistence of the [`VaultDocument`] — spec §4.2.
//!
//! Grounded in `other_examples/29531fa3_Quabena-ferreus-vault…storage.rs`
//! (temp file + `sync_all` + rename, backup-filename generation) and the
//! teacher's own `core/file.rs` atomic-write helper. Advisory locking is
//! grounded in `rust-us-kv-rs/kv/src/storage/log.rs`, which reaches for
//! `fs4::FileExt` around the same lock-then-mutate shape.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::FileExt;

use crate::consts::BACKUP_SUFFIX;
use crate::error::Result;
use crate::model::VaultDocument;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Reads and atomically writes the vault document at a fixed path.
pub struct Storage {
    path: PathBuf,
    backup_on_save: bool,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), backup_on_save: true }
    }

    /// Whether `save` writes a `.backup` copy of the previous contents
    /// before overwriting — spec §4.2 step 2, "if backup is requested".
    /// Defaults to `true`.
    pub fn with_backup_on_save(mut self, backup_on_save: bool) -> Self {
        self.backup_on_save = backup_on_save;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the vault document currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the vault document, taking a shared advisory lock for the
    /// duration of the read. A missing file yields an empty document
    /// (first-run bootstrap, spec §4.2).
    pub fn load(&self) -> Result<VaultDocument> {
        if !self.exists() {
            #[cfg(feature = "logging")]
            debug!(path = %self.path.display(), "vault file absent, starting empty");
            return Ok(VaultDocument::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let contents = fs::read_to_string(&self.path);
        let _ = FileExt::unlock(&file);
        let contents = contents?;

        if contents.trim().is_empty() {
            return Ok(VaultDocument::new());
        }
        let doc: VaultDocument = serde_yaml::from_str(&contents)?;
        Ok(doc)
    }

    /// Persist `doc` atomically: write to a sibling temp file, `fsync`, then
    /// rename over the real path. A best-effort `.backup` copy of the
    /// previous contents is written first; failure to back up is logged but
    /// never aborts the save.
    pub fn save(&self, doc: &VaultDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if self.backup_on_save && self.exists() {
            if let Err(_err) = self.backup() {
                #[cfg(feature = "logging")]
                warn!(path = %self.path.display(), error = %_err, "failed to write backup before save");
            }
        }

        let yaml = serde_yaml::to_string(doc)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(".vault-tmp-")
            .tempfile_in(parent)?;

        use std::io::Write;
        tmp.write_all(yaml.as_bytes())?;
        tmp.as_file().sync_all()?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.path)?;
        lock_file.lock_exclusive()?;
        let result = tmp.persist(&self.path).map(|_| ()).map_err(|e| e.error);
        let _ = FileExt::unlock(&lock_file);

        result.map_err(Into::into)
    }

    /// Remove the vault document from disk. Not an error if it is already
    /// absent.
    pub fn delete(&self) -> Result<()> {
        if self.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn backup(&self) -> Result<()> {
        fs::copy(&self.path, self.backup_path())?;
        Ok(())
    }

    /// Restore the vault document from its `.backup` copy, overwriting
    /// whatever is currently on disk. A missing backup is not an error — it
    /// yields `Ok(None)` (spec §4.2: "returning `false` if no backup
    /// exists"). Any other I/O or parse failure still propagates as `Err`.
    pub fn restore_from_backup(&self) -> Result<Option<VaultDocument>> {
        let backup = self.backup_path();
        if !backup.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&backup)?;
        fs::copy(&backup, &self.path)?;
        let doc: VaultDocument = serde_yaml::from_str(&contents)?;
        Ok(Some(doc))
    }
}
