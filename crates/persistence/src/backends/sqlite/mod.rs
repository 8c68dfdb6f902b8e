//! SQLite backend implementation.
//!
//! Supports in-memory databases (for tests) and file-based databases.
//!
//! # Example
//!
//! ```no_run
//! use chacer_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE resources (
//!     resource_type TEXT NOT NULL,
//!     name TEXT NOT NULL,
//!     ancestor_1 TEXT NOT NULL DEFAULT '',
//!     ancestor_2 TEXT NOT NULL DEFAULT '',
//!     resource_id TEXT NOT NULL,
//!     data TEXT NOT NULL,         -- JSON document
//!     create_time TEXT NOT NULL,  -- RFC 3339
//!     update_time TEXT,
//!     PRIMARY KEY (resource_type, name)
//! );
//! ```

mod backend;
pub mod schema;
mod storage;
mod transaction;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use transaction::SqliteTransaction;
