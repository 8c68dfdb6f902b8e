//! The contract between catalog types and the storage layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A resource stored under a hierarchical resource name.
///
/// Entities are persisted as JSON documents. The storage layer derives the
/// ancestor columns it scopes and orders by from [`Entity::name`] parsed
/// against [`Entity::COLLECTIONS`].
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Discriminator stored alongside each row, e.g. `Account`.
    const RESOURCE_TYPE: &'static str;

    /// Collection sequence of this entity's names.
    const COLLECTIONS: &'static [&'static str];

    /// The fully-qualified resource name.
    fn name(&self) -> &str;

    fn create_time(&self) -> DateTime<Utc>;

    fn update_time(&self) -> Option<DateTime<Utc>>;

    fn set_update_time(&mut self, time: DateTime<Utc>);

    /// The most recent of the create and update times.
    fn last_modified(&self) -> DateTime<Utc> {
        self.update_time()
            .map_or(self.create_time(), |updated| updated.max(self.create_time()))
    }
}
