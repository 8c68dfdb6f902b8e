//! Transaction support for SQLite backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::core::Transaction;
use crate::error::{StorageError, StorageResult, TransactionError};
use crate::types::Entity;

use super::storage::{ResourceRow, internal_error, select_by_name};

/// A SQLite transaction.
///
/// Opened with `BEGIN IMMEDIATE`, so the write lock is taken up front and
/// concurrent check-then-insert sequences serialize instead of failing at
/// commit time.
pub struct SqliteTransaction {
    /// The connection used for this transaction.
    conn: Mutex<PooledConnection<SqliteConnectionManager>>,
    /// Whether the transaction is still active.
    active: bool,
}

impl std::fmt::Debug for SqliteTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTransaction")
            .field("active", &self.active)
            .finish()
    }
}

impl SqliteTransaction {
    /// Starts a transaction on `conn`.
    pub(super) fn new(conn: PooledConnection<SqliteConnectionManager>) -> StorageResult<Self> {
        conn.execute("BEGIN IMMEDIATE", []).map_err(|e| {
            internal_error(format!("Failed to begin transaction: {}", e))
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            active: true,
        })
    }

    fn ensure_active(&self) -> StorageResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(StorageError::Transaction(
                TransactionError::InvalidTransaction,
            ))
        }
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn get<E: Entity>(&mut self, name: &str) -> StorageResult<Option<E>> {
        self.ensure_active()?;
        let conn = self.conn.lock();
        select_by_name(&conn, name)
    }

    async fn insert<E: Entity>(&mut self, entity: &E) -> StorageResult<()> {
        self.ensure_active()?;
        let row = ResourceRow::from_entity(entity)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO resources
                (resource_type, name, ancestor_1, ancestor_2, resource_id, data, create_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                E::RESOURCE_TYPE,
                row.name,
                row.ancestors[0],
                row.ancestors[1],
                row.resource_id,
                row.data,
                row.create_time,
                row.update_time,
            ],
        )
        .map_err(|e| internal_error(format!("Failed to insert {}: {}", row.name, e)))?;

        Ok(())
    }

    async fn update<E: Entity>(&mut self, entity: &E) -> StorageResult<()> {
        self.ensure_active()?;
        let row = ResourceRow::from_entity(entity)?;
        let conn = self.conn.lock();

        let changed = conn
            .execute(
                "UPDATE resources SET data = ?1, update_time = ?2
                 WHERE resource_type = ?3 AND name = ?4",
                params![row.data, row.update_time, E::RESOURCE_TYPE, row.name],
            )
            .map_err(|e| internal_error(format!("Failed to update {}: {}", row.name, e)))?;

        if changed == 0 {
            return Err(internal_error(format!(
                "Failed to update {}: no such row",
                row.name
            )));
        }
        Ok(())
    }

    async fn delete<E: Entity>(&mut self, name: &str) -> StorageResult<bool> {
        self.ensure_active()?;
        let conn = self.conn.lock();

        let changed = conn
            .execute(
                "DELETE FROM resources WHERE resource_type = ?1 AND name = ?2",
                params![E::RESOURCE_TYPE, name],
            )
            .map_err(|e| internal_error(format!("Failed to delete {}: {}", name, e)))?;

        Ok(changed > 0)
    }

    async fn commit(mut self: Box<Self>) -> StorageResult<()> {
        self.ensure_active()?;

        self.conn.lock().execute("COMMIT", []).map_err(|e| {
            StorageError::Transaction(TransactionError::RolledBack {
                reason: format!("Commit failed: {}", e),
            })
        })?;

        self.active = false;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> StorageResult<()> {
        self.ensure_active()?;

        self.conn.lock().execute("ROLLBACK", []).map_err(|e| {
            StorageError::Transaction(TransactionError::RolledBack {
                reason: format!("Rollback failed: {}", e),
            })
        })?;

        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for SqliteTransaction {
    fn drop(&mut self) {
        // Neither committed nor rolled back.
        if self.active {
            let _ = self.conn.get_mut().execute("ROLLBACK", []);
        }
    }
}
