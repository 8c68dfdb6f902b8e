//! # chacer-api - Catalog request handlers
//!
//! Handlers for the Chacer catalog: accounts, the locations inside them and
//! the rooms inside those. Handlers are plain async functions taking the
//! shared [`AppState`] and a request message; any transport can route to
//! them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chacer_api::{ServerConfig, build_state, handlers, init_logging};
//! use chacer_api::types::{CreateAccountRequest, GetAccountRequest};
//! use chacer_persistence::types::Account;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env();
//!     init_logging(&config.log_level);
//!
//!     let state = build_state(config)?;
//!
//!     let account = handlers::create_account(&state, CreateAccountRequest {
//!         account_id: "acme-corp".to_string(),
//!         account: Some(Account {
//!             display_name: "Acme Corp".to_string(),
//!             ..Default::default()
//!         }),
//!     })
//!     .await?;
//!     assert_eq!(account.name, "accounts/acme-corp");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every handler returns [`ApiError`], carrying one of these codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `INVALID_ARGUMENT` | The request failed validation; every violation is listed |
//! | `NOT_FOUND` | The named resource, or the parent of a new one, does not exist |
//! | `ALREADY_EXISTS` | A resource with the new name already exists |
//! | `FAILED_PRECONDITION` | The account is already in the requested phase |
//! | `INTERNAL` | The store failed; details are logged, not returned |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and status codes
//! - [`state`] - Application state (coordinator, page token codec, configuration)
//! - [`types`] - Request and response messages
//! - [`validation`] - Request validation
//! - [`handlers`] - Account, location and room handlers

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod types;
pub mod validation;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, InitError};
pub use state::AppState;

#[cfg(feature = "sqlite")]
use chacer_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};
#[cfg(feature = "sqlite")]
use tracing::info;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("chacer_api={},chacer_persistence={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Opens the SQLite database named by the configuration and brings its
/// schema up to date.
#[cfg(feature = "sqlite")]
pub fn create_sqlite_backend(
    config: &ServerConfig,
) -> chacer_persistence::StorageResult<SqliteBackend> {
    info!(database = %config.database_url, "Initializing SQLite backend");

    let backend =
        SqliteBackend::with_config(&config.database_url, SqliteBackendConfig::default())?;
    backend.init_schema()?;

    Ok(backend)
}

/// Validates the configuration and assembles the application state.
#[cfg(feature = "sqlite")]
pub fn build_state(config: ServerConfig) -> Result<AppState<SqliteBackend>, InitError> {
    config.validate().map_err(InitError::Config)?;

    let paginator = config
        .paginator()
        .map_err(|e| InitError::Config(vec![e]))?;
    let backend = create_sqlite_backend(&config)?;

    info!(
        service_name = %config.service_name,
        max_page_size = config.max_page_size,
        "Catalog state initialized"
    );
    Ok(AppState::new(std::sync::Arc::new(backend), paginator, config))
}
