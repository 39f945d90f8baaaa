// tests/support.rs
use std::path::PathBuf;

use secrets_vault::{Vault, VaultOptions};
use tempfile::TempDir;

#[cfg(feature = "logging")]
use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    #[cfg(feature = "logging")]
    {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init();
        });
    }
}

/// A vault rooted in a fresh temp directory, with a freshly generated key.
pub struct TestVault {
    pub dir: TempDir,
    pub key: Vec<u8>,
    pub vault: Vault,
}

impl TestVault {
    pub fn new() -> Self {
        init_test_logging();

        let dir = TempDir::new().expect("failed to create temp dir");
        let key = secrets_vault::crypto::generate_key().expose_secret().to_vec();
        let vault = Self::open(&dir, key.clone());

        Self { dir, key, vault }
    }

    pub fn vault_file(dir: &TempDir) -> PathBuf {
        dir.path().join("secrets.yaml")
    }

    pub fn audit_file(dir: &TempDir) -> PathBuf {
        dir.path().join("audit.jsonl")
    }

    fn open(dir: &TempDir, key: Vec<u8>) -> Vault {
        Vault::new(VaultOptions {
            master_key: Some(key),
            vault_file: Some(Self::vault_file(dir)),
            audit_file: Some(Self::audit_file(dir)),
            auto_save: Some(true),
            ..Default::default()
        })
        .expect("failed to open vault")
    }

    /// Reopen the same on-disk vault under `key`.
    pub fn reopen_with(&self, key: Vec<u8>) -> Vault {
        Self::open(&self.dir, key)
    }

    /// Reopen the same on-disk vault under its original key.
    pub fn reopen(&self) -> Vault {
        self.reopen_with(self.key.clone())
    }
}
