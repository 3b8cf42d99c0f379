//! BackupManager tests.

mod common;

use std::sync::Arc;

use character_recovery::{
    BACKUPS_KEY, BackupManager, BackupSource, KeyValueStore, MemoryKeyValueStore, RecoveryConfig,
    RecoveryError,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

fn manager() -> BackupManager {
    BackupManager::new(Arc::new(MemoryKeyValueStore::new()))
}

#[test]
fn test_create_backup_records_metadata() {
    let manager = manager();
    let draft = common::partial_draft("Legolas");

    let backup = manager.create_backup(&draft, BackupSource::Manual, Some("char-1"));

    assert!(backup.id.starts_with("backup_"));
    assert_eq!(backup.character_id.as_deref(), Some("char-1"));
    assert_eq!(backup.source, BackupSource::Manual);
    assert!(backup.is_valid);
    assert_eq!(backup.data, draft);
    assert_eq!(manager.all_backups(), vec![backup]);
}

#[test]
fn test_backup_ids_are_unique_for_identical_drafts() {
    let manager = manager();
    let draft = json!({ "name": "Twin" });
    let timestamp = Utc::now();

    let first = manager.create_backup_at(&draft, BackupSource::Manual, None, timestamp);
    let second = manager.create_backup_at(&draft, BackupSource::Manual, None, timestamp);

    assert_ne!(first.id, second.id);
    assert_eq!(first.data, second.data);
}

#[test]
fn test_empty_draft_is_not_restorable() {
    let manager = manager();

    let backup = manager.create_backup(&json!({ "notes": "todo" }), BackupSource::AutoSave, None);

    assert!(!backup.is_valid);
    assert!(backup.character_id.is_none());
}

#[test]
fn test_restore_round_trip() {
    let manager = manager();
    let draft = common::valid_character();
    let backup = manager.create_backup(&draft, BackupSource::Manual, None);

    let mut restored = manager.restore_from_backup(&backup.id).unwrap();
    assert_eq!(restored, draft);

    restored["name"] = json!("Strider");
    let again = manager.restore_from_backup(&backup.id).unwrap();
    assert_eq!(again["name"], json!("Aragorn"));
}

#[test]
fn test_mutating_source_draft_does_not_touch_backup() {
    let manager = manager();
    let mut draft = common::partial_draft("Gimli");
    let backup = manager.create_backup(&draft, BackupSource::Manual, None);

    draft["name"] = json!("Changed");
    draft["abilityScores"]["strength"] = json!(3);

    let restored = manager.restore_from_backup(&backup.id).unwrap();
    assert_eq!(restored["name"], json!("Gimli"));
    assert_eq!(restored["abilityScores"]["strength"], json!(10));
    assert_eq!(backup.data["name"], json!("Gimli"));
}

#[test]
fn test_restore_unknown_id_fails_with_id_in_message() {
    let manager = manager();

    let err = manager.restore_from_backup("non-existent-id").unwrap_err();

    assert!(matches!(err, RecoveryError::BackupNotFound(_)));
    assert!(err.to_string().contains("non-existent-id"));
}

#[test]
fn test_retention_keeps_ten_most_recent() {
    let manager = manager();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

    let created: Vec<_> = (0..15)
        .map(|i| {
            manager.create_backup_at(
                &json!({ "name": format!("draft {i}") }),
                BackupSource::AutoSave,
                None,
                start + Duration::minutes(i),
            )
        })
        .collect();

    let stored = manager.all_backups();
    assert_eq!(stored.len(), 10);

    let mut stored_ids: Vec<_> = stored.iter().map(|b| b.id.clone()).collect();
    let mut newest_ids: Vec<_> = created[5..].iter().map(|b| b.id.clone()).collect();
    stored_ids.sort();
    newest_ids.sort();
    assert_eq!(stored_ids, newest_ids);
}

#[test]
fn test_retention_respects_configured_bound() {
    let config = RecoveryConfig {
        max_backups: 3,
        ..RecoveryConfig::default()
    };
    let manager = BackupManager::with_config(Arc::new(MemoryKeyValueStore::new()), &config);
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    for i in 0..5 {
        let at = start + Duration::seconds(i);
        manager.create_backup_at(&json!({ "name": i }), BackupSource::Manual, None, at);
    }

    let names: Vec<_> = manager
        .all_backups()
        .iter()
        .map(|b| b.data["name"].clone())
        .collect();
    assert_eq!(names, vec![json!(4), json!(3), json!(2)]);
}

#[test]
fn test_retention_tie_break_is_stable() {
    let config = RecoveryConfig {
        max_backups: 2,
        ..RecoveryConfig::default()
    };
    let manager = BackupManager::with_config(Arc::new(MemoryKeyValueStore::new()), &config);
    let same = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

    let manual = BackupSource::Manual;
    let first = manager.create_backup_at(&json!({ "name": "a" }), manual, None, same);
    let second = manager.create_backup_at(&json!({ "name": "b" }), manual, None, same);
    manager.create_backup_at(&json!({ "name": "c" }), manual, None, same);

    let ids: Vec<_> = manager.all_backups().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn test_create_backup_keeps_readable_records_next_to_broken_ones() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store
        .set(
            BACKUPS_KEY,
            r#"[{"id":"backup_1_a","timestamp":"2025-01-01T00:00:00Z",
                 "data":{"name":"Gimli"},"source":"manual","isValid":true},
                {"id":"backup_2_b","timestamp":"2025-01-02T00:00:00Z",
                 "data":{"name":"Half written"},"source":"manual"}]"#,
        )
        .unwrap();
    let manager = BackupManager::new(store);

    let created = manager.create_backup(&json!({ "name": "Gloin" }), BackupSource::Manual, None);

    let ids: Vec<String> = manager.all_backups().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["backup_1_a".to_string(), created.id]);
    assert_eq!(
        manager.restore_from_backup("backup_1_a").unwrap(),
        json!({ "name": "Gimli" })
    );
}

#[test]
fn test_character_backups_filter_preserves_order() {
    let manager = manager();
    let manual = BackupSource::Manual;
    let first = manager.create_backup(&json!({ "name": "one" }), manual, Some("char1"));
    manager.create_backup(&json!({ "name": "two" }), manual, Some("char2"));
    let third = manager.create_backup(&json!({ "name": "three" }), manual, Some("char1"));

    let backups = manager.character_backups("char1");

    assert_eq!(backups.len(), 2);
    assert_eq!(backups[0].id, first.id);
    assert_eq!(backups[1].id, third.id);
    assert!(manager.character_backups("char3").is_empty());
}

#[test]
fn test_delete_backup_and_ignore_unknown() {
    let manager = manager();
    let keep = manager.create_backup(&json!({ "name": "keep" }), BackupSource::Manual, None);
    let drop = manager.create_backup(&json!({ "name": "drop" }), BackupSource::Manual, None);

    manager.delete_backup(&drop.id);
    manager.delete_backup("missing");

    let ids: Vec<_> = manager.all_backups().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![keep.id]);
    assert!(manager.restore_from_backup(&drop.id).is_err());
}

#[test]
fn test_clear_all_backups_removes_key() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let manager = BackupManager::new(store.clone());
    manager.create_backup(&json!({ "name": "x" }), BackupSource::Manual, None);

    manager.clear_all_backups();

    assert!(manager.all_backups().is_empty());
    assert!(store.get(BACKUPS_KEY).unwrap().is_none());
}

#[test]
fn test_create_backup_survives_failing_storage() {
    let manager = BackupManager::new(Arc::new(common::FailingStore));
    let draft = json!({ "name": "Offline" });

    let backup = manager.create_backup(&draft, BackupSource::Manual, None);

    assert_eq!(backup.data, draft);
    assert!(manager.all_backups().is_empty());
    assert!(manager.restore_from_backup(&backup.id).is_err());
}

#[test]
fn test_create_backup_survives_quota_exceeded() {
    let manager = BackupManager::new(Arc::new(MemoryKeyValueStore::with_capacity_bytes(64)));
    let draft = json!({ "name": "x".repeat(200) });

    let backup = manager.create_backup(&draft, BackupSource::Manual, None);

    assert!(backup.is_valid);
    assert!(manager.all_backups().is_empty());
}

#[test]
fn test_pre_operation_backup_allows_rollback() {
    let manager = manager();
    let draft = common::partial_draft("Boromir");

    let (backup, outcome) = manager.with_pre_operation_backup(&draft, Some("char-9"), || {
        Err::<(), &str>("import failed")
    });

    assert!(outcome.is_err());
    assert_eq!(backup.source, BackupSource::PreOperation);
    assert_eq!(manager.restore_from_backup(&backup.id).unwrap(), draft);
}
