//! Central, lazy-loaded configuration — ambient stack, spec §4.5/§6 defaults.
//!
//! Mirrors the teacher's `config/app.rs`/`config/defaults.rs` split: a
//! TOML file if present, falling back to built-in defaults, cached in a
//! `OnceLock`. Adapted from the teacher's crypto-key/db-path tunables to the
//! vault's own knobs (document path, key-file path, backup-on-save).

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::consts::{DEFAULT_KEY_FILE_NAME, DEFAULT_VAULT_DIR_NAME, DEFAULT_VAULT_FILE};

/// Environment variable pointing at a TOML config file, checked before
/// falling back to built-in defaults.
pub const ENV_CONFIG_PATH: &str = "VAULT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub behavior: Behavior,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    #[serde(default = "default_vault_file")]
    pub vault_file: String,
    #[serde(default = "default_key_file_name")]
    pub key_file_name: String,
    #[serde(default = "default_vault_dir_name")]
    pub vault_dir_name: String,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            key_file_name: default_key_file_name(),
            vault_dir_name: default_vault_dir_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Behavior {
    /// Whether `Storage::save` writes a `.backup` before overwriting.
    #[serde(default = "default_backup_on_save")]
    pub backup_on_save: bool,
    /// Whether `Vault::new` auto-saves after every mutating call.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            backup_on_save: default_backup_on_save(),
            auto_save: default_auto_save(),
        }
    }
}

fn default_vault_file() -> String {
    DEFAULT_VAULT_FILE.to_string()
}

fn default_key_file_name() -> String {
    DEFAULT_KEY_FILE_NAME.to_string()
}

fn default_vault_dir_name() -> String {
    DEFAULT_VAULT_DIR_NAME.to_string()
}

fn default_backup_on_save() -> bool {
    true
}

fn default_auto_save() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Paths::default(),
            behavior: Behavior::default(),
        }
    }
}

impl Config {
    /// Resolve the default master-key file path: `~/.vault/master.key`,
    /// falling back to a relative path if the home directory can't be
    /// determined.
    pub fn default_key_file_path(&self) -> PathBuf {
        match dirs::home_dir() {
            Some(home) => home.join(&self.paths.vault_dir_name).join(&self.paths.key_file_name),
            None => PathBuf::from(&self.paths.vault_dir_name).join(&self.paths.key_file_name),
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load the global config once per process: `$VAULT_CONFIG` as a TOML file
/// if set and present, otherwise built-in defaults.
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_default();
        if !path.is_empty() && std::path::Path::new(&path).exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                    #[cfg(feature = "logging")]
                    tracing::warn!(path = %path, error = %e, "invalid config TOML, using defaults");
                    let _ = e;
                    Config::default()
                }),
                Err(_e) => Config::default(),
            }
        } else {
            Config::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.paths.vault_file, ".vault/secrets.yaml");
        assert!(cfg.behavior.backup_on_save);
        assert!(cfg.behavior.auto_save);
    }

    #[test]
    fn default_key_file_path_ends_in_vault_dir() {
        let cfg = Config::default();
        let path = cfg.default_key_file_path();
        assert!(path.ends_with(".vault/master.key"));
    }
}
