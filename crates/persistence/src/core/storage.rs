//! Catalog storage trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::Entity;

use super::query::ListQuery;
use super::transaction::Transaction;

/// A transactional document store for catalog entities.
///
/// Reads outside a transaction see committed data only. Every check-then-act
/// sequence goes through [`CatalogStorage::begin`].
///
/// # Example
///
/// ```ignore
/// use chacer_persistence::core::{CatalogStorage, Transaction};
/// use chacer_persistence::types::Account;
///
/// async fn rename<S: CatalogStorage>(storage: &S) -> StorageResult<()> {
///     let mut tx = Box::new(storage.begin().await?);
///     if let Some(mut account) = tx.get::<Account>("accounts/acme").await? {
///         account.display_name = "Acme Corp".to_string();
///         tx.update(&account).await?;
///     }
///     tx.commit().await
/// }
/// ```
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    type Transaction: Transaction;

    /// Opens a write transaction.
    async fn begin(&self) -> StorageResult<Self::Transaction>;

    /// Reads an entity by name.
    async fn get<E: Entity>(&self, name: &str) -> StorageResult<Option<E>>;

    /// Lists entities matching `query` in ancestor then resource ID order.
    async fn list<E: Entity>(&self, query: &ListQuery) -> StorageResult<Vec<E>>;
}
