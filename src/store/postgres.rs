use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::oneshot;

use super::changes::{ChangeCallback, ChangeRegistry, Subscription};
use super::error::StorageError;
use super::port::TablePort;
use crate::models::record::FlatRecord;

/// Channel the `arranchamento` trigger notifies on every statement.
pub const CHANGE_CHANNEL: &str = "arranchamento_changes";

const SELECT_ROWS: &str = "\
    SELECT id, nome, nome_guerra, graduacao, om, \
           cafe_segunda, cafe_terca, cafe_quarta, cafe_quinta, cafe_sexta, \
           almoco_segunda, almoco_terca, almoco_quarta, almoco_quinta, almoco_sexta, \
           created_at \
    FROM arranchamento \
    ORDER BY created_at DESC, seq DESC";

/// The `arranchamento` table in PostgreSQL, with LISTEN/NOTIFY as change feed.
pub struct PgTable {
    pool: PgPool,
    changes: Arc<ChangeRegistry>,
    // Dropping the table drops this sender, which stops the listener task.
    _listener_shutdown: oneshot::Sender<()>,
}

impl PgTable {
    /// Wrap the pool and start the background listener that fans
    /// notifications out to subscribers. The listener lives as long as the table.
    pub async fn connect(pool: PgPool) -> Result<Self, sqlx::Error> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;

        let changes = ChangeRegistry::new();
        let registry = Arc::downgrade(&changes);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    received = listener.recv() => match received {
                        Ok(notification) => {
                            let Some(registry) = registry.upgrade() else { break };
                            log::debug!("Change notification: {}", notification.payload());
                            registry.notify();
                        }
                        Err(e) => {
                            log::warn!("Change listener error, retrying: {e}");
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                    },
                }
            }
            log::info!("Change listener stopped");
        });

        Ok(Self { pool, changes, _listener_shutdown: shutdown_tx })
    }
}

#[async_trait]
impl TablePort for PgTable {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, row: &FlatRecord) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO arranchamento \
             (id, nome, nome_guerra, graduacao, om, \
              cafe_segunda, cafe_terca, cafe_quarta, cafe_quinta, cafe_sexta, \
              almoco_segunda, almoco_terca, almoco_quarta, almoco_quinta, almoco_sexta, \
              created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(&row.id)
        .bind(&row.nome)
        .bind(&row.nome_guerra)
        .bind(&row.graduacao)
        .bind(&row.om)
        .bind(row.cafe_segunda)
        .bind(row.cafe_terca)
        .bind(row.cafe_quarta)
        .bind(row.cafe_quinta)
        .bind(row.cafe_sexta)
        .bind(row.almoco_segunda)
        .bind(row.almoco_terca)
        .bind(row.almoco_quarta)
        .bind(row.almoco_quinta)
        .bind(row.almoco_sexta)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn select_newest_first(&self) -> Result<Vec<FlatRecord>, StorageError> {
        let rows = sqlx::query_as::<_, FlatRecord>(SELECT_ROWS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM arranchamento WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM arranchamento")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Subscription {
        self.changes.register(on_change)
    }
}
