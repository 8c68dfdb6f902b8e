//! Transactional create, update and delete of catalog entities.
//!
//! Every mutating operation runs as one store transaction: read the current
//! row, decide, write, commit. Absent or already-present rows are reported as
//! `None` and leave the store untouched; callers turn them into `NotFound` or
//! `AlreadyExists`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult, TransactionError};
use crate::types::{Entity, Masked, UpdateOptions, merge};

use super::query::ListQuery;
use super::storage::CatalogStorage;
use super::transaction::Transaction;

/// Runs catalog operations against a [`CatalogStorage`].
#[derive(Debug)]
pub struct Coordinator<S> {
    storage: Arc<S>,
}

impl<S> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: CatalogStorage> Coordinator<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Inserts the entity built by `build` unless `name` already exists.
    ///
    /// `build` receives the creation timestamp and must produce an entity
    /// named `name`. Returns `None` if the name was taken.
    pub async fn create_if_absent<E, F>(&self, name: &str, build: F) -> StorageResult<Option<E>>
    where
        E: Entity,
        F: FnOnce(DateTime<Utc>) -> E + Send,
    {
        let mut tx = Box::new(self.storage.begin().await?);

        if tx.get::<E>(name).await?.is_some() {
            debug!(resource_type = E::RESOURCE_TYPE, name, "create skipped, already exists");
            rollback(tx).await;
            return Ok(None);
        }

        let entity = build(Utc::now());
        if entity.name() != name {
            rollback(tx).await;
            return Err(name_changed(name, entity.name()));
        }

        tx.insert(&entity).await?;
        tx.commit().await?;

        debug!(resource_type = E::RESOURCE_TYPE, name, "created");
        Ok(Some(entity))
    }

    /// Applies `mutate` to the current value of `name` and stores the result.
    ///
    /// The update time is stamped after `mutate` runs and is never earlier
    /// than the entity's last modification. An error from `mutate` rolls the
    /// transaction back and is returned unchanged. Returns `Ok(None)` if the
    /// entity does not exist.
    pub async fn read_modify_write<E, F, Err>(
        &self,
        name: &str,
        mutate: F,
    ) -> Result<Option<E>, Err>
    where
        E: Entity,
        F: FnOnce(E) -> Result<E, Err> + Send,
        Err: From<StorageError> + Send,
    {
        let mut tx = Box::new(self.storage.begin().await?);

        let Some(existing) = tx.get::<E>(name).await? else {
            rollback(tx).await;
            return Ok(None);
        };

        let last_modified = existing.last_modified();
        let mut updated = match mutate(existing) {
            Ok(updated) => updated,
            Err(err) => {
                rollback(tx).await;
                return Err(err);
            }
        };

        if updated.name() != name {
            rollback(tx).await;
            return Err(name_changed(name, updated.name()).into());
        }

        updated.set_update_time(Utc::now().max(last_modified));
        tx.update(&updated).await?;
        tx.commit().await?;

        debug!(resource_type = E::RESOURCE_TYPE, name, "updated");
        Ok(Some(updated))
    }

    /// Merges `update` into the stored entity of the same name through the update mask.
    pub async fn update_masked<E>(
        &self,
        update: &E,
        options: &UpdateOptions,
    ) -> StorageResult<Option<E>>
    where
        E: Entity + Masked,
    {
        let mask = &options.update_mask;
        self.read_modify_write(update.name(), |existing: E| {
            merge(&existing, update, mask).map_err(StorageError::from)
        })
        .await
    }

    /// Removes `name` and returns the entity as it was before deletion.
    pub async fn delete<E: Entity>(&self, name: &str) -> StorageResult<Option<E>> {
        let mut tx = Box::new(self.storage.begin().await?);

        let Some(existing) = tx.get::<E>(name).await? else {
            rollback(tx).await;
            return Ok(None);
        };

        tx.delete::<E>(name).await?;
        tx.commit().await?;

        debug!(resource_type = E::RESOURCE_TYPE, name, "deleted");
        Ok(Some(existing))
    }

    /// Reads `name` outside of any transaction.
    pub async fn get<E: Entity>(&self, name: &str) -> StorageResult<Option<E>> {
        self.storage.get(name).await
    }

    /// Lists entities outside of any transaction.
    pub async fn list<E: Entity>(&self, query: &ListQuery) -> StorageResult<Vec<E>> {
        self.storage.list(query).await
    }
}

async fn rollback<T: Transaction>(tx: Box<T>) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "rollback failed");
    }
}

fn name_changed(expected: &str, actual: &str) -> StorageError {
    StorageError::Transaction(TransactionError::RolledBack {
        reason: format!("resource name changed from {expected} to {actual}"),
    })
}
