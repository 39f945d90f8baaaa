//! Append-only audit trail — spec §2 (component table) / §3 `AuditEntry`.
//!
//! Persisted as JSON Lines (one [`AuditEntry`] per line), mirroring
//! `original_source/…audit.py`'s `AuditLogger`, which appends one JSON
//! object per line to a flat file and loads the whole file into memory to
//! answer queries. `get_logs` there sorts most-recent-first; we follow that
//! since spec.md itself is silent on ordering (see DESIGN.md).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{AuditEntry, Key, Metadata, Operation};

#[cfg(feature = "cli")]
use std::io::BufWriter;

/// Append-only log of every vault operation, backed by a JSON-Lines file.
pub struct AuditLog {
    path: PathBuf,
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Load existing entries from `path`, if any. A missing or empty file
    /// starts with no history.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.is_file() {
            let contents = fs::read_to_string(&path)?;
            contents
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|line| serde_json::from_str::<AuditEntry>(line))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| crate::error::VaultError::CorruptedVault(format!("audit log: {e}")))?
        } else {
            Vec::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a new entry in memory and append it to the on-disk log.
    ///
    /// Per spec §6, a failure to open the log file for append is never
    /// fatal: the entry still lands in memory and is available to `query`,
    /// it just won't survive the next reload. This method therefore never
    /// fails on I/O; it only returns `Err` if the entry itself can't be
    /// serialized, which doesn't happen for this data shape in practice.
    pub fn record(
        &mut self,
        operation: Operation,
        key: Option<Key>,
        success: bool,
        error: Option<String>,
        metadata: Metadata,
    ) -> Result<()> {
        let entry = AuditEntry {
            timestamp: chrono::Utc::now(),
            operation,
            key,
            success,
            error,
            metadata,
        };

        let line = serde_json::to_string(&entry)
            .map_err(|e| crate::error::VaultError::Other(format!("failed to serialize audit entry: {e}")))?;

        if let Err(_err) = self.append_line(&line) {
            #[cfg(feature = "logging")]
            tracing::warn!(path = %self.path.display(), error = %_err, "audit log append failed, falling back to in-memory only");
        }

        self.entries.push(entry);
        Ok(())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Query the log, most-recent-first, optionally filtered by key and/or
    /// operation and capped at `limit` results.
    pub fn query(&self, key: Option<&str>, operation: Option<Operation>, limit: Option<usize>) -> Vec<&AuditEntry> {
        let mut results: Vec<&AuditEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| key.map(|k| e.key.as_deref() == Some(k)).unwrap_or(true))
            .filter(|e| operation.map(|op| e.operation == op).unwrap_or(true))
            .collect();

        if let Some(limit) = limit {
            results.truncate(limit);
        }
        results
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Erase all audit history, in memory and on disk.
    pub fn clear_logs(&mut self) -> Result<()> {
        self.entries.clear();
        if self.path.is_file() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Write the full (unfiltered, most-recent-first) log as pretty JSON.
    #[cfg(feature = "cli")]
    pub fn export_json(&self, dest: impl AsRef<Path>) -> Result<()> {
        let ordered: Vec<&AuditEntry> = self.entries.iter().rev().collect();
        let file = fs::File::create(dest)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &ordered)
            .map_err(|e| crate::error::VaultError::Other(format!("failed to export audit log: {e}")))?;
        Ok(())
    }

    /// Write the full (unfiltered, most-recent-first) log as CSV.
    #[cfg(feature = "cli")]
    pub fn export_csv(&self, dest: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(dest)?;
        writer.write_record(["timestamp", "operation", "key", "success", "error"])?;
        for entry in self.entries.iter().rev() {
            writer.write_record([
                entry.timestamp.to_rfc3339(),
                entry.operation.to_string(),
                entry.key.clone().unwrap_or_default(),
                entry.success.to_string(),
                entry.error.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl From<csv::Error> for crate::error::VaultError {
    fn from(err: csv::Error) -> Self {
        crate::error::VaultError::Other(format!("csv export failed: {err}"))
    }
}
