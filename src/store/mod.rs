//! Record store: the single owner of the record collection.
//!
//! Two variants share one contract:
//! - local: in-memory snapshot written through a [`KeyValuePort`]
//! - remote: a [`TablePort`] with a change feed that consumers subscribe to
//!
//! Storage failures stop here. They are logged and reported as `false`.

pub mod changes;
pub mod error;
pub mod local;
pub mod memory;
pub mod port;
pub mod postgres;

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use rand::Rng;
use tokio::sync::mpsc;

use crate::config::StorageBackend;
use crate::db;
use crate::models::record::{FlatRecord, NewRecord, Record};
pub use changes::{ChangeCallback, ChangeRegistry, Subscription};
pub use error::StorageError;
pub use local::{FileKeyValue, LocalRecords, MemoryKeyValue, STORAGE_KEY};
pub use memory::MemoryTable;
pub use port::{KeyValuePort, TablePort};
pub use postgres::PgTable;

enum Backend {
    Local(LocalRecords),
    Remote(Arc<dyn TablePort>),
}

pub struct RecordStore {
    backend: Backend,
}

impl RecordStore {
    pub fn local(port: impl KeyValuePort + 'static) -> Self {
        Self { backend: Backend::Local(LocalRecords::open(Box::new(port))) }
    }

    pub fn remote(table: Arc<dyn TablePort>) -> Self {
        Self { backend: Backend::Remote(table) }
    }

    /// Open the configured backend. Remote storage connects, migrates and
    /// starts the change listener before returning.
    pub async fn open(backend: &StorageBackend) -> Result<Self, StorageError> {
        let store = match backend {
            StorageBackend::Local { data_dir } => Self::local(FileKeyValue::open(data_dir)?),
            StorageBackend::Remote { database_url } => {
                let pool = db::init_pool(database_url).await?;
                db::run_migrations(&pool).await?;
                Self::remote(Arc::new(PgTable::connect(pool).await?))
            }
            StorageBackend::Memory => Self::remote(Arc::new(MemoryTable::new())),
        };
        log::info!("Record store ready ({} backend)", store.backend_name());
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Local(_) => "local",
            Backend::Remote(table) => table.name(),
        }
    }

    /// Whether [`RecordStore::subscribe`] yields a change stream.
    pub const fn is_live(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    /// All records, newest first. Read failures are logged and yield an empty list.
    pub async fn list(&self) -> Vec<Record> {
        let rows = match &self.backend {
            Backend::Local(local) => local.rows(),
            Backend::Remote(table) => match table.select_newest_first().await {
                Ok(rows) => rows,
                Err(e) => {
                    log::error!("Failed to list records from {}: {e}", table.name());
                    return Vec::new();
                }
            },
        };
        rows.into_iter().map(Record::from).collect()
    }

    /// Persist a new record with a fresh id and timestamp.
    pub async fn add(&self, candidate: NewRecord) -> bool {
        let record = Record {
            id: new_id(),
            nome: candidate.nome,
            nome_guerra: candidate.nome_guerra,
            graduacao: candidate.graduacao,
            om: candidate.om,
            breakfast: candidate.breakfast,
            lunch: candidate.lunch,
            // Microseconds: the precision PostgreSQL keeps.
            created_at: Utc::now().trunc_subsecs(6),
        };
        let row = FlatRecord::from(&record);
        let result = match &self.backend {
            Backend::Local(local) => local.insert(row),
            Backend::Remote(table) => table.insert(&row).await,
        };
        match result {
            Ok(()) => {
                log::info!("Record {} added ({} {})", record.id, record.graduacao, record.nome_guerra);
                true
            }
            Err(e) => {
                log::error!("Failed to add record: {e}");
                false
            }
        }
    }

    /// Delete one record. Unknown ids are a no-op and still report success.
    pub async fn delete(&self, id: &str) -> bool {
        let result = match &self.backend {
            Backend::Local(local) => local.delete(id),
            Backend::Remote(table) => table.delete(id).await,
        };
        match result {
            Ok(()) => {
                log::info!("Record {id} deleted");
                true
            }
            Err(e) => {
                log::error!("Failed to delete record {id}: {e}");
                false
            }
        }
    }

    /// Remove every record. Irreversible.
    pub async fn clear_all(&self) -> bool {
        let result = match &self.backend {
            Backend::Local(local) => local.clear(),
            Backend::Remote(table) => table.delete_all().await,
        };
        match result {
            Ok(()) => {
                log::info!("All records cleared");
                true
            }
            Err(e) => {
                log::error!("Failed to clear records: {e}");
                false
            }
        }
    }

    /// Refetch triggers for every change in the remote table. `None` for the
    /// local variant. Dropping the stream deregisters it.
    pub fn subscribe(&self) -> Option<ChangeStream> {
        let Backend::Remote(table) = &self.backend else {
            return None;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = table.subscribe(Arc::new(move || {
            let _ = tx.send(());
        }));
        Some(ChangeStream { rx, _subscription: subscription })
    }
}

/// Live registration against the remote change feed.
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<()>,
    _subscription: Subscription,
}

impl ChangeStream {
    /// Wait for the next change. Bursts are collapsed into one trigger.
    pub async fn next(&mut self) -> Option<()> {
        self.rx.recv().await?;
        while self.rx.try_recv().is_ok() {}
        Some(())
    }

    /// Non-blocking check for a pending trigger.
    pub fn try_next(&mut self) -> bool {
        let mut seen = false;
        while self.rx.try_recv().is_ok() {
            seen = true;
        }
        seen
    }
}

/// 32 hex characters from 16 random bytes.
fn new_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}
