use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::changes::{ChangeCallback, ChangeRegistry, Subscription};
use super::error::StorageError;
use super::port::TablePort;
use crate::models::record::FlatRecord;

/// Volatile table with a synchronous change feed. Used when no database is
/// configured for a live deployment, and as a stand-in for PostgreSQL in tests.
#[derive(Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<FlatRecord>>,
    changes: Arc<ChangeRegistry>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.changes.len()
    }
}

#[async_trait]
impl TablePort for MemoryTable {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, row: &FlatRecord) -> Result<(), StorageError> {
        {
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            if rows.iter().any(|r| r.id == row.id) {
                return Err(StorageError::Unavailable(format!("duplicate id {}", row.id)));
            }
            rows.push(row.clone());
        }
        self.changes.notify();
        Ok(())
    }

    async fn select_newest_first(&self) -> Result<Vec<FlatRecord>, StorageError> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<FlatRecord> = rows.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let removed = {
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let before = rows.len();
            rows.retain(|r| r.id != id);
            before != rows.len()
        };
        if removed {
            self.changes.notify();
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.changes.notify();
        Ok(())
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Subscription {
        self.changes.register(on_change)
    }
}
