//! Record store over a real PostgreSQL database.
//!
//! Ignored by default. Run with:
//! `DATABASE_URL=postgres://... cargo test --test postgres_store_test -- --ignored --test-threads=1`

#[macro_use]
mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use sqlx::PgPool;

use arranchamento::db;
use arranchamento::models::record::{FlatRecord, Record};
use arranchamento::store::{PgTable, RecordStore, TablePort};
use common::*;

async fn pg_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::init_pool(&url).await.expect("connect");
    db::run_migrations(&pool).await.expect("migrate");
    pool
}

async fn pg_store() -> RecordStore {
    let pool = pg_pool().await;
    let store = RecordStore::remote(Arc::new(PgTable::connect(pool).await.expect("listener")));
    assert!(store.clear_all().await);
    store
}

#[tokio::test]
#[ignore]
async fn test_postgres_round_trip() {
    let store = pg_store().await;

    assert!(store.add(full_candidate()).await);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(store.add(candidate("Sgt", "Souza")).await);

    let records = store.list().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].nome_guerra, "Souza");
    assert_eq!(records[1].nome, "João Carlos da Silva");
    assert_eq!(records[1].breakfast, full_candidate().breakfast);
    assert_eq!(records[1].lunch, full_candidate().lunch);

    assert!(store.delete(&records[0].id).await);
    assert!(store.delete("missing").await);
    assert_eq!(store.list().await.len(), 1);

    assert!(store.clear_all().await);
    assert!(store.list().await.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_postgres_notifies_subscribers() {
    let store = pg_store().await;
    let mut changes = store.subscribe().expect("remote store is live");

    assert!(store.add(candidate("Cb", "Silva")).await);

    let fired = tokio::time::timeout(Duration::from_secs(5), changes.next()).await;
    assert_eq!(fired.expect("notification within 5s"), Some(()));
}

#[tokio::test]
#[ignore]
async fn test_postgres_equal_timestamps_list_later_insert_first() {
    let table = PgTable::connect(pg_pool().await).await.expect("listener");
    table.delete_all().await.expect("clear");

    let created_at = Utc::now().trunc_subsecs(6);
    for (id, name) in [("tie-first", "Primeiro"), ("tie-second", "Segundo")] {
        let record = Record {
            id: id.to_string(),
            nome: String::new(),
            nome_guerra: name.to_string(),
            graduacao: "Sd".to_string(),
            om: String::new(),
            breakfast: Default::default(),
            lunch: Default::default(),
            created_at,
        };
        table.insert(&FlatRecord::from(&record)).await.expect("insert");
    }

    let ids: Vec<String> = table
        .select_newest_first()
        .await
        .expect("select")
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, ["tie-second", "tie-first"]);

    table.delete_all().await.expect("clear");
}

#[tokio::test]
#[ignore]
async fn test_postgres_listener_released_when_table_dropped() {
    let pool = pg_pool().await;
    let table = PgTable::connect(pool.clone()).await.expect("listener");
    drop(table);

    // No NOTIFY arrives here; the listener must still give its connection back
    for _ in 0..100 {
        if pool.num_idle() == pool.size() as usize {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(pool.num_idle(), pool.size() as usize);
}
