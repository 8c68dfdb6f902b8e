//! Transaction support.
//!
//! A [`Transaction`] holds exclusive write access to the store from `begin`
//! until `commit` or `rollback`. Implementations roll back on drop when
//! neither was called, so an early return or a cancelled future never leaves
//! partial writes behind.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::Entity;

/// An open store transaction.
#[async_trait]
pub trait Transaction: Send {
    /// Reads an entity by name within the transaction.
    async fn get<E: Entity>(&mut self, name: &str) -> StorageResult<Option<E>>;

    /// Inserts a new entity. Fails if the name is already taken.
    async fn insert<E: Entity>(&mut self, entity: &E) -> StorageResult<()>;

    /// Replaces an existing entity.
    async fn update<E: Entity>(&mut self, entity: &E) -> StorageResult<()>;

    /// Removes an entity. Returns `false` if nothing was removed.
    async fn delete<E: Entity>(&mut self, name: &str) -> StorageResult<bool>;

    /// Commits the transaction.
    async fn commit(self: Box<Self>) -> StorageResult<()>;

    /// Rolls back the transaction.
    async fn rollback(self: Box<Self>) -> StorageResult<()>;

    /// Returns whether the transaction is still active.
    fn is_active(&self) -> bool;
}
