// tests/audit_tests.rs
//! Direct coverage of `secrets_vault::audit::AuditLog`.

use secrets_vault::audit::AuditLog;
use secrets_vault::model::{Metadata, Operation};

#[test]
fn entries_survive_a_fresh_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");

    {
        let mut log = AuditLog::new(&path).unwrap();
        log.record(Operation::Init, None, true, None, Metadata::new()).unwrap();
        log.record(Operation::Set, Some("k".to_string()), true, None, Metadata::new())
            .unwrap();
    }

    let reloaded = AuditLog::new(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    let entries = reloaded.query(None, None, None);
    assert_eq!(entries[0].operation, Operation::Set);
}

#[test]
fn failed_operation_is_recorded_with_error_string() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = AuditLog::new(dir.path().join("audit.jsonl")).unwrap();
    log.record(
        Operation::Get,
        Some("missing".to_string()),
        false,
        Some("secret not found".to_string()),
        Metadata::new(),
    )
    .unwrap();

    let entries = log.query(None, None, None);
    assert!(!entries[0].success);
    assert_eq!(entries[0].error.as_deref(), Some("secret not found"));
}

#[cfg(feature = "cli")]
#[test]
fn export_json_and_csv_produce_readable_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = AuditLog::new(dir.path().join("audit.jsonl")).unwrap();
    log.record(Operation::Set, Some("k".to_string()), true, None, Metadata::new())
        .unwrap();

    let json_path = dir.path().join("export.json");
    log.export_json(&json_path).unwrap();
    let contents = std::fs::read_to_string(&json_path).unwrap();
    assert!(contents.contains("\"operation\""));

    let csv_path = dir.path().join("export.csv");
    log.export_csv(&csv_path).unwrap();
    let csv_contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv_contents.starts_with("timestamp,operation,key,success,error"));
}
