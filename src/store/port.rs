use async_trait::async_trait;

use super::changes::{ChangeCallback, Subscription};
use super::error::StorageError;
use crate::models::record::FlatRecord;

/// Key-value persistence used by the local variant.
pub trait KeyValuePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Hosted table used by the remote variant, with a change feed.
#[async_trait]
pub trait TablePort: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn insert(&self, row: &FlatRecord) -> Result<(), StorageError>;

    /// Every row, most recent `created_at` first.
    async fn select_newest_first(&self) -> Result<Vec<FlatRecord>, StorageError>;

    /// Delete one row. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    async fn delete_all(&self) -> Result<(), StorageError>;

    /// Call `on_change` after any insert, update or delete in the table.
    fn subscribe(&self, on_change: ChangeCallback) -> Subscription;
}
