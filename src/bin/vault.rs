//! vault — command-line driver for secrets-vault
//!
//! A thin driver over [`secrets_vault::Vault`]: argument parsing and
//! human-readable output only, no policy of its own (spec §1, §6).

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use secrets_vault::{Vault, VaultOptions};

#[derive(Parser)]
#[command(name = "vault", about = "A local, file-backed secrets vault")]
struct Cli {
    /// Path to the vault document. Defaults to $VAULT_FILE or .vault/secrets.yaml
    #[arg(long, global = true)]
    vault_file: Option<PathBuf>,

    /// Path to the master-key file. Defaults to $VAULT_MASTER_KEY_FILE or ~/.vault/master.key
    #[arg(long, global = true)]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new key file and empty vault file.
    Init {
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Set or update a secret.
    Set {
        key: String,
        value: Option<String>,
        #[arg(long)]
        stdin: bool,
    },
    /// Print a secret's value.
    Get {
        key: String,
        #[arg(long)]
        version: Option<u32>,
        #[arg(long)]
        raw: bool,
    },
    /// Delete a secret and its entire version history.
    Delete {
        key: String,
        #[arg(long)]
        yes: bool,
    },
    /// Rotate the master key, re-encrypting every stored secret.
    Rotate {
        #[arg(long)]
        new_key_file: Option<PathBuf>,
        #[arg(long)]
        yes: bool,
    },
    /// List secret names.
    List,
    /// Show a secret's version history.
    ListVersions { key: String },
    /// Dump audit log entries.
    Audit {
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        /// Write the full log to this path as JSON instead of printing it.
        #[arg(long)]
        export_json: Option<PathBuf>,
        /// Write the full log to this path as CSV instead of printing it.
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Command::Init { output_dir, force } = &cli.command {
        return run_init(output_dir.clone(), *force, cli.vault_file.clone());
    }

    let mut vault = Vault::new(VaultOptions {
        master_key: None,
        key_file: cli.key_file.clone(),
        vault_file: cli.vault_file.clone(),
        audit_file: None,
        auto_save: Some(true),
    })
    .context("failed to open vault")?;

    match cli.command {
        Command::Init { .. } => unreachable!(),
        Command::Set { key, value, stdin } => {
            let plaintext = resolve_value(value, stdin)?;
            let version = vault.set(&key, plaintext.as_bytes(), None)?;
            println!("set '{key}' -> version {version}");
        }
        Command::Get { key, version, raw } => {
            let value = vault.get(&key, version)?;
            let text = String::from_utf8_lossy(&value);
            if raw {
                print!("{text}");
            } else {
                println!("{key} = {text}");
            }
        }
        Command::Delete { key, yes } => {
            if !yes && !confirm(&format!("Delete '{key}' and all its versions?"))? {
                println!("aborted");
                return Ok(());
            }
            if vault.delete(&key)? {
                println!("deleted '{key}'");
            } else {
                println!("'{key}' did not exist");
            }
        }
        Command::Rotate { new_key_file, yes } => {
            if !yes && !confirm("Rotate the master key? All secrets will be re-encrypted.")? {
                println!("aborted");
                return Ok(());
            }
            let new_key = vault.rotate(None)?;
            let encoded = secrets_vault::crypto::key_to_string(&new_key);
            match new_key_file {
                Some(path) => {
                    std::fs::write(&path, &new_key).with_context(|| format!("failed to write {}", path.display()))?;
                    set_owner_read_write(&path);
                    println!("rotated; new key written to {}", path.display());
                }
                None => {
                    eprintln!("rotated; new key (base64, not persisted by this tool): {encoded}");
                }
            }
        }
        Command::List => {
            for key in vault.list_keys() {
                println!("{key}");
            }
        }
        Command::ListVersions { key } => {
            for v in vault.list_versions(&key) {
                println!("version {}  {}", v.version, v.timestamp.to_rfc3339());
            }
        }
        Command::Audit { key, limit, export_json, export_csv } => {
            if let Some(path) = export_json {
                vault.export_audit_log_json(&path)?;
                println!("audit log exported to {}", path.display());
            } else if let Some(path) = export_csv {
                vault.export_audit_log_csv(&path)?;
                println!("audit log exported to {}", path.display());
            } else {
                for entry in vault.get_audit_log(key.as_deref(), limit) {
                    println!(
                        "{}  {:<13}  key={:<20}  success={}",
                        entry.timestamp.to_rfc3339(),
                        entry.operation,
                        entry.key.as_deref().unwrap_or("-"),
                        entry.success,
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_init(output_dir: Option<PathBuf>, force: bool, vault_file: Option<PathBuf>) -> Result<()> {
    let dir = output_dir.unwrap_or_else(|| PathBuf::from(".vault"));
    let key_path = dir.join("master.key");
    let vault_path = vault_file.unwrap_or_else(|| dir.join("secrets.yaml"));

    if !force && (key_path.exists() || vault_path.exists()) {
        bail!(
            "{} or {} already exists; pass --force to overwrite",
            key_path.display(),
            vault_path.display()
        );
    }

    std::fs::create_dir_all(&dir)?;
    let key = secrets_vault::crypto::generate_key();
    std::fs::write(&key_path, key.expose_secret())?;
    set_owner_read_write(&key_path);

    // An empty document is all `Storage::save` needs to bootstrap the file.
    let vault = Vault::new(VaultOptions {
        master_key: Some(key.expose_secret().to_vec()),
        vault_file: Some(vault_path.clone()),
        ..Default::default()
    })?;
    vault.save()?;

    println!("initialized vault at {}", vault_path.display());
    println!("master key written to {}", key_path.display());
    Ok(())
}

fn resolve_value(value: Option<String>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim_end_matches('\n').to_string());
    }
    if let Some(v) = value {
        return Ok(v);
    }
    rpassword::prompt_password("Value: ").context("failed to read value")
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(unix)]
fn set_owner_read_write(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = std::fs::metadata(path) {
        let mut perms = metadata.permissions();
        perms.set_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }
}

#[cfg(not(unix))]
fn set_owner_read_write(_path: &std::path::Path) {}
