//! Shared constants — see spec §4.1, §4.5, §6.

/// AES-256-GCM key size in bytes.
pub const MASTER_KEY_LEN: usize = 32;

/// AES-256-GCM nonce size in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Default vault document path, relative to the process's current directory.
pub const DEFAULT_VAULT_FILE: &str = ".vault/secrets.yaml";

/// Default master-key file, relative to the user's home directory.
pub const DEFAULT_KEY_FILE_NAME: &str = "master.key";

/// Directory under the user's home that holds the default key file.
pub const DEFAULT_VAULT_DIR_NAME: &str = ".vault";

/// Environment variable carrying a base64-encoded master key.
pub const ENV_MASTER_KEY: &str = "VAULT_MASTER_KEY";

/// Environment variable overriding the master-key file path.
pub const ENV_MASTER_KEY_FILE: &str = "VAULT_MASTER_KEY_FILE";

/// Environment variable overriding the vault document path.
pub const ENV_VAULT_FILE: &str = "VAULT_FILE";

/// Suffix appended to the vault path to name its backup file.
pub const BACKUP_SUFFIX: &str = "backup";
