//! Server configuration for the catalog API.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CHACER_LOG_LEVEL` | info | Log level |
//! | `CHACER_DATABASE_URL` | chacer.db | SQLite path, or `:memory:` |
//! | `CHACER_PAGE_TOKEN_SECRET` | (random) | Base64 of the 32-byte page token key |
//! | `CHACER_DEFAULT_PAGE_SIZE` | 25 | Page size used when a request asks for 0 |
//! | `CHACER_MAX_PAGE_SIZE` | 500 | Largest accepted page size |
//! | `CHACER_SERVICE_NAME` | //apis.chacerapp.com/ | Prefix of every self link |
//!
//! # Example
//!
//! ```rust
//! use chacer_api::ServerConfig;
//!
//! let config = ServerConfig {
//!     default_page_size: 50,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use chacer_persistence::types::{KEY_LEN, Paginator};
use clap::Parser;
use tracing::warn;

/// Catalog API configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "chacer-api")]
#[command(about = "Chacer catalog API")]
pub struct ServerConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "CHACER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// SQLite database path.
    #[arg(long, env = "CHACER_DATABASE_URL", default_value = "chacer.db")]
    pub database_url: String,

    /// Base64-encoded AES-256 key for page tokens.
    #[arg(long, env = "CHACER_PAGE_TOKEN_SECRET", hide_env_values = true)]
    pub page_token_secret: Option<String>,

    /// Page size used when a list request sends 0.
    #[arg(long, env = "CHACER_DEFAULT_PAGE_SIZE", default_value = "25")]
    pub default_page_size: u32,

    /// Maximum page size a list request may ask for.
    #[arg(long, env = "CHACER_MAX_PAGE_SIZE", default_value = "500")]
    pub max_page_size: u32,

    /// Prefix prepended to resource names to form self links.
    #[arg(long, env = "CHACER_SERVICE_NAME", default_value = "//apis.chacerapp.com/")]
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            database_url: "chacer.db".to_string(),
            page_token_secret: None,
            default_page_size: 25,
            max_page_size: 500,
            service_name: "//apis.chacerapp.com/".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns whether the database lives in memory.
    pub fn is_memory_database(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Validates the configuration, reporting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.database_url.is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if self.service_name.is_empty() {
            errors.push("Service name cannot be empty".to_string());
        }

        if let Err(e) = self.page_token_key() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Decodes the configured page token key, if any.
    pub fn page_token_key(&self) -> Result<Option<[u8; KEY_LEN]>, String> {
        let Some(secret) = &self.page_token_secret else {
            return Ok(None);
        };

        let bytes = STANDARD
            .decode(secret.trim())
            .map_err(|e| format!("Page token secret is not valid base64: {}", e))?;
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            format!(
                "Page token secret must decode to {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )
        })?;
        Ok(Some(key))
    }

    /// Builds the page token codec.
    ///
    /// Without a configured secret a random key is generated, so tokens do
    /// not survive a restart and are not accepted by other replicas.
    pub fn paginator(&self) -> Result<Paginator, String> {
        match self.page_token_key()? {
            Some(key) => Ok(Paginator::new(key)),
            None => {
                warn!("CHACER_PAGE_TOKEN_SECRET is not set, generated a random page token key");
                Ok(Paginator::random())
            }
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            database_url: ":memory:".to_string(),
            page_token_secret: None,
            default_page_size: 10,
            max_page_size: 100,
            service_name: "//apis.chacerapp.com/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 500);
        assert_eq!(config.service_name, "//apis.chacerapp.com/");
        assert!(!config.is_memory_database());
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(ServerConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = ServerConfig {
            default_page_size: 100,
            max_page_size: 50,
            service_name: String::new(),
            page_token_secret: Some("not base64!".to_string()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("max page size")));
        assert!(errors.iter().any(|e| e.contains("Service name")));
        assert!(errors.iter().any(|e| e.contains("base64")));
    }

    #[test]
    fn test_page_token_key_length() {
        let config = ServerConfig {
            page_token_secret: Some(STANDARD.encode([7u8; 16])),
            ..Default::default()
        };
        let err = config.page_token_key().unwrap_err();
        assert!(err.contains("32 bytes, got 16"));

        let config = ServerConfig {
            page_token_secret: Some(STANDARD.encode([7u8; KEY_LEN])),
            ..Default::default()
        };
        assert_eq!(config.page_token_key().unwrap(), Some([7u8; KEY_LEN]));
    }

    #[test]
    fn test_configured_key_is_shared_between_paginators() {
        let config = ServerConfig {
            page_token_secret: Some(STANDARD.encode([9u8; KEY_LEN])),
            ..Default::default()
        };
        let issuer = config.paginator().unwrap();
        let verifier = config.paginator().unwrap();

        let token = issuer
            .encode(&chacer_persistence::types::PageInfo::default(), 10)
            .unwrap();
        assert_eq!(verifier.decode(&token).unwrap().end_cursor, 10);
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "chacer-api",
            "--database-url",
            ":memory:",
            "--max-page-size",
            "200",
        ])
        .unwrap();
        assert!(config.is_memory_database());
        assert_eq!(config.max_page_size, 200);
    }
}
