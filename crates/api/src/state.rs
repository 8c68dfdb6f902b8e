//! Application state shared by every handler.

use std::sync::Arc;

use chacer_persistence::core::{CatalogStorage, Coordinator};
use chacer_persistence::types::Paginator;

use crate::config::ServerConfig;

/// Shared state for the catalog handlers.
///
/// Cloning is cheap: the coordinator, paginator and configuration are all
/// reference counted.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use chacer_api::{AppState, ServerConfig};
/// use chacer_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// backend.init_schema()?;
/// let config = ServerConfig::for_testing();
/// let paginator = config.paginator()?;
/// let state = AppState::new(Arc::new(backend), paginator, config);
/// ```
pub struct AppState<S> {
    coordinator: Coordinator<S>,

    /// Page token codec. The key is fixed for the life of the process.
    paginator: Arc<Paginator>,

    config: Arc<ServerConfig>,
}

// Manual impl so that S itself does not need to be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            paginator: Arc::clone(&self.paginator),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: CatalogStorage> AppState<S> {
    pub fn new(storage: Arc<S>, paginator: Paginator, config: ServerConfig) -> Self {
        Self {
            coordinator: Coordinator::new(storage),
            paginator: Arc::new(paginator),
            config: Arc::new(config),
        }
    }

    /// Returns the transactional coordinator.
    pub fn coordinator(&self) -> &Coordinator<S> {
        &self.coordinator
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Page size used when a list request asks for 0.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    /// Prefix of every self link.
    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Builds the self link of a resource.
    pub fn self_link(&self, name: &str) -> String {
        format!("{}{}", self.config.service_name, name)
    }
}
