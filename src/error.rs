//! Public error type for the entire crate

use thiserror::Error;

/// Everything that can go wrong inside `secrets-vault`.
///
/// `MasterKeyNotFound`, `SecretNotFound` and `Authentication` are allowed to
/// pass through the [`crate::Vault`] facade unchanged so callers can match on
/// them directly; every other internal failure is re-wrapped as `Other` at
/// the facade boundary (see `vault.rs`).
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("master key not found: {0}")]
    MasterKeyNotFound(String),

    #[error("secret '{key}' not found{version}", version = .version.map(|v| format!(" (version {v})")).unwrap_or_default())]
    SecretNotFound { key: String, version: Option<u32> },

    #[error("master key must be exactly 32 bytes, got {0}")]
    KeyLength(usize),

    #[error("authentication failed: wrong key, tampering, or corruption")]
    Authentication,

    #[error("malformed encrypted blob: {0}")]
    MalformedBlob(String),

    #[error("vault file is corrupted: {0}")]
    CorruptedVault(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rotation aborted: {0}")]
    Rotation(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl From<base64::DecodeError> for VaultError {
    fn from(err: base64::DecodeError) -> Self {
        VaultError::MalformedBlob(err.to_string())
    }
}

impl From<serde_yaml::Error> for VaultError {
    fn from(err: serde_yaml::Error) -> Self {
        VaultError::CorruptedVault(err.to_string())
    }
}
