//! Record store contract - covers both variants:
//! - local: snapshot written through a key-value port
//! - remote: table port with a change feed

#[macro_use]
mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use arranchamento::models::record::{DayMap, FlatRecord};
use arranchamento::store::{
    ChangeCallback, ChangeRegistry, FileKeyValue, KeyValuePort, LocalRecords, MemoryKeyValue,
    MemoryTable, RecordStore, STORAGE_KEY, StorageError, Subscription, TablePort,
};
use common::*;

/// One store per variant; every contract test runs against both.
fn variants() -> Vec<RecordStore> {
    vec![local_store(), live_store().1]
}

// ---------------------------------------------------------------------------
// Contract shared by both variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    for store in variants() {
        assert!(store.list().await.is_empty(), "{} store", store.backend_name());
    }
}

#[tokio::test]
async fn test_add_then_list_returns_submitted_fields() {
    for store in variants() {
        let submitted = full_candidate();
        assert!(store.add(submitted.clone()).await);

        let records = store.list().await;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert!(!r.id.is_empty());
        assert_eq!(r.nome, submitted.nome);
        assert_eq!(r.nome_guerra, submitted.nome_guerra);
        assert_eq!(r.graduacao, submitted.graduacao);
        assert_eq!(r.om, submitted.om);
        assert_eq!(r.breakfast, submitted.breakfast);
        assert_eq!(r.lunch, submitted.lunch);
    }
}

#[tokio::test]
async fn test_ids_are_unique() {
    for store in variants() {
        for i in 0..20 {
            assert!(store.add(candidate("Sd", &format!("Soldado{i}"))).await);
        }
        let mut ids: Vec<String> = store.list().await.into_iter().map(|r| r.id).collect();
        assert!(ids.iter().all(|id| id.len() == 32));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    for store in variants() {
        store.add(candidate("Sd", "Primeiro")).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        store.add(candidate("Sd", "Segundo")).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        store.add(candidate("Sd", "Terceiro")).await;

        let names: Vec<String> = store.list().await.into_iter().map(|r| r.nome_guerra).collect();
        assert_eq!(names, ["Terceiro", "Segundo", "Primeiro"]);

        let records = store.list().await;
        assert!(records.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}

#[tokio::test]
async fn test_delete_removes_only_that_record() {
    for store in variants() {
        store.add(candidate("Cb", "Silva")).await;
        store.add(candidate("Sgt", "Souza")).await;
        let target = store.list().await.into_iter().find(|r| r.nome_guerra == "Silva").expect("added");

        assert!(store.delete(&target.id).await);

        let remaining = store.list().await;
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|r| r.id != target.id));
        assert_eq!(remaining[0].nome_guerra, "Souza");
    }
}

#[tokio::test]
async fn test_delete_unknown_id_is_a_noop() {
    for store in variants() {
        store.add(candidate("Cb", "Silva")).await;
        let before = store.list().await;

        assert!(store.delete("does-not-exist").await);
        assert!(store.delete("").await);

        assert_eq!(store.list().await, before);
    }
}

#[tokio::test]
async fn test_clear_all_empties_store() {
    for store in variants() {
        for name in ["A", "B", "C"] {
            store.add(candidate("Sd", name)).await;
        }
        assert!(store.clear_all().await);
        assert!(store.list().await.is_empty());

        // Clearing an empty store is fine too
        assert!(store.clear_all().await);
        assert!(store.list().await.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Local variant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_local_records_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");

    let store = RecordStore::local(FileKeyValue::open(dir.path()).expect("open"));
    store.add(full_candidate()).await;
    store.add(candidate("Sgt", "Souza")).await;
    let before = store.list().await;
    drop(store);

    let reopened = RecordStore::local(FileKeyValue::open(dir.path()).expect("reopen"));
    assert_eq!(reopened.list().await, before);
}

#[tokio::test]
async fn test_local_persists_flat_columns() {
    let dir = TempDir::new().expect("temp dir");
    let port = FileKeyValue::open(dir.path()).expect("open");
    let store = RecordStore::local(FileKeyValue::open(dir.path()).expect("open"));
    store.add(full_candidate()).await;

    let raw = port.get(STORAGE_KEY).expect("read").expect("key written");
    let rows: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("json array");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["nome_guerra"], "Silva");
    assert_eq!(row["cafe_segunda"], true);
    assert_eq!(row["cafe_terca"], false);
    assert_eq!(row["almoco_sexta"], true);
    assert!(row.get("breakfast").is_none());
}

#[tokio::test]
async fn test_local_clear_all_removes_key() {
    let port = Arc::new(MemoryKeyValue::new());
    let store = RecordStore::local(SharedPort(port.clone()));
    store.add(candidate("Cb", "Silva")).await;
    assert!(port.get(STORAGE_KEY).expect("get").is_some());

    store.clear_all().await;
    assert!(port.get(STORAGE_KEY).expect("get").is_none());
}

#[tokio::test]
async fn test_local_loads_rows_without_optional_fields() {
    let legacy = r#"[{"id":"abc","nome_guerra":"Silva","graduacao":"Cb",
                      "cafe_segunda":true,"created_at":"2025-01-06T08:00:00Z"}]"#;
    let store = RecordStore::local(MemoryKeyValue::with_entry(STORAGE_KEY, legacy));

    let records = store.list().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].nome, "");
    assert_eq!(records[0].om, "");
    assert_eq!(records[0].breakfast, DayMap { monday: true, ..DayMap::default() });
    assert_eq!(records[0].lunch, DayMap::default());
}

#[tokio::test]
async fn test_local_malformed_data_starts_empty() {
    let store = RecordStore::local(MemoryKeyValue::with_entry(STORAGE_KEY, "[{\"id\": 1"));
    assert!(store.list().await.is_empty());

    // And the store is still usable afterwards
    assert!(store.add(candidate("Cb", "Silva")).await);
    assert_eq!(store.list().await.len(), 1);
}

#[tokio::test]
async fn test_local_failed_write_changes_nothing() {
    let port = Arc::new(MemoryKeyValue::new());
    let failing = FlakyPort { inner: port.clone(), fail: Arc::new(std::sync::atomic::AtomicBool::new(false)) };
    let switch = failing.fail.clone();
    let store = RecordStore::local(failing);

    assert!(store.add(candidate("Cb", "Silva")).await);
    let before = store.list().await;

    switch.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(!store.add(candidate("Sgt", "Souza")).await);
    assert!(!store.delete(&before[0].id).await);
    assert!(!store.clear_all().await);
    assert_eq!(store.list().await, before);

    switch.store(false, std::sync::atomic::Ordering::SeqCst);
    assert!(store.delete(&before[0].id).await);
    assert!(store.list().await.is_empty());
}

#[tokio::test]
async fn test_local_store_has_no_subscription() {
    let store = local_store();
    assert!(!store.is_live());
    assert!(store.subscribe().is_none());
}

// ---------------------------------------------------------------------------
// Remote variant
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_remote_subscription_fires_on_every_mutation() {
    let (table, store) = live_store();
    assert!(store.is_live());
    let mut changes = store.subscribe().expect("remote store is live");
    assert_eq!(table.subscriber_count(), 1);
    assert!(!changes.try_next());

    store.add(candidate("Cb", "Silva")).await;
    assert!(changes.try_next());

    let id = store.list().await[0].id.clone();
    store.delete(&id).await;
    assert!(changes.try_next());

    store.clear_all().await;
    assert!(changes.try_next());
}

#[tokio::test]
async fn test_remote_subscription_next_collapses_bursts() {
    let (_table, store) = live_store();
    let mut changes = store.subscribe().expect("live");

    store.add(candidate("Cb", "A")).await;
    store.add(candidate("Cb", "B")).await;
    store.add(candidate("Cb", "C")).await;

    assert_eq!(changes.next().await, Some(()));
    assert!(!changes.try_next());
}

#[tokio::test]
async fn test_remote_dropped_subscription_is_deregistered() {
    let (table, store) = live_store();
    let first = store.subscribe().expect("live");
    let mut second = store.subscribe().expect("live");
    assert_eq!(table.subscriber_count(), 2);

    drop(first);
    assert_eq!(table.subscriber_count(), 1);

    store.add(candidate("Cb", "Silva")).await;
    assert!(second.try_next());

    drop(second);
    assert_eq!(table.subscriber_count(), 0);
}

#[tokio::test]
async fn test_remote_delete_unknown_id_does_not_notify() {
    let (_table, store) = live_store();
    let mut changes = store.subscribe().expect("live");
    store.delete("missing").await;
    assert!(!changes.try_next());
}

#[tokio::test]
async fn test_remote_failures_report_false() {
    let store = RecordStore::remote(Arc::new(DownTable::default()));

    assert!(!store.add(candidate("Cb", "Silva")).await);
    assert!(!store.delete("abc").await);
    assert!(!store.clear_all().await);
    assert!(store.list().await.is_empty());
}

// ---------------------------------------------------------------------------
// Ordering ties
// ---------------------------------------------------------------------------

fn row_at(id: &str, created_at: chrono::DateTime<chrono::Utc>) -> FlatRecord {
    FlatRecord::from(&arranchamento::models::record::Record {
        id: id.to_string(),
        nome: String::new(),
        nome_guerra: id.to_string(),
        graduacao: "Sd".to_string(),
        om: String::new(),
        breakfast: DayMap::default(),
        lunch: DayMap::default(),
        created_at,
    })
}

#[tokio::test]
async fn test_equal_timestamps_list_later_insert_first() {
    use chrono::SubsecRound;
    let created_at = chrono::Utc::now().trunc_subsecs(6);

    let local = LocalRecords::open(Box::new(MemoryKeyValue::new()));
    local.insert(row_at("first", created_at)).expect("insert");
    local.insert(row_at("second", created_at)).expect("insert");
    let ids: Vec<String> = local.rows().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, ["second", "first"]);

    let table = MemoryTable::new();
    table.insert(&row_at("first", created_at)).await.expect("insert");
    table.insert(&row_at("second", created_at)).await.expect("insert");
    let ids: Vec<String> = table
        .select_newest_first()
        .await
        .expect("select")
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["second", "first"]);
}

// ---------------------------------------------------------------------------
// Test ports
// ---------------------------------------------------------------------------

/// Forwards to a shared port so the test can inspect it afterwards.
struct SharedPort(Arc<MemoryKeyValue>);

impl KeyValuePort for SharedPort {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove(key)
    }
}

/// Writes fail while `fail` is set.
struct FlakyPort {
    inner: Arc<MemoryKeyValue>,
    fail: Arc<std::sync::atomic::AtomicBool>,
}

impl FlakyPort {
    fn check(&self) -> Result<(), StorageError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        Ok(())
    }
}

impl KeyValuePort for FlakyPort {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.remove(key)
    }
}

/// A table whose connection is always down.
#[derive(Default)]
struct DownTable {
    changes: Arc<ChangeRegistry>,
}

#[async_trait]
impl TablePort for DownTable {
    fn name(&self) -> &'static str {
        "down"
    }
    async fn insert(&self, _row: &FlatRecord) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
    async fn select_newest_first(&self) -> Result<Vec<FlatRecord>, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
    async fn delete(&self, _id: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
    async fn delete_all(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
    fn subscribe(&self, on_change: ChangeCallback) -> Subscription {
        self.changes.register(on_change)
    }
}
