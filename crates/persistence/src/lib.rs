//! Chacer Catalog Persistence Layer
//!
//! This crate stores the Chacer catalog, a multi-tenant hierarchy of
//! accounts, locations and rooms, and provides the building blocks the API
//! layer needs around it.
//!
//! # Architecture
//!
//! - [`name`] - Hierarchical resource names (`accounts/{a}/locations/{l}`)
//! - [`types`] - Catalog entities, field masks and page tokens
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits and the transactional [`core::Coordinator`]
//! - [`backends`] - Backend implementations (SQLite)
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chacer_persistence::backends::sqlite::SqliteBackend;
//! use chacer_persistence::core::Coordinator;
//! use chacer_persistence::types::{Account, AccountQuotas, AccountStatus};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! let coordinator = Coordinator::new(Arc::new(backend));
//!
//! let created = coordinator
//!     .create_if_absent("accounts/acme", |now| Account {
//!         name: "accounts/acme".to_string(),
//!         uid: String::new(),
//!         self_link: "//apis.chacerapp.com/accounts/acme".to_string(),
//!         display_name: "Acme".to_string(),
//!         create_time: now,
//!         update_time: None,
//!         status: AccountStatus::active(),
//!         quotas: AccountQuotas {
//!             name: AccountQuotas::name_for("accounts/acme"),
//!             ..AccountQuotas::default()
//!         },
//!     })
//!     .await?;
//! assert!(created.is_some());
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod core;
pub mod error;
pub mod name;
pub mod types;

pub use error::{StorageError, StorageResult};
