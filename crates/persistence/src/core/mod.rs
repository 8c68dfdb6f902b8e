//! Core storage traits and abstractions.
//!
//! - [`CatalogStorage`] - Transactional document store
//! - [`Transaction`] - An open write transaction
//! - [`ListQuery`] - Scoped, paged listings
//! - [`Coordinator`] - Create-if-absent, read-modify-write and delete on top of a store

mod coordinator;
mod query;
mod storage;
mod transaction;

pub use coordinator::Coordinator;
pub use query::ListQuery;
pub use storage::CatalogStorage;
pub use transaction::Transaction;
