//! Error types for the persistence layer.
//!
//! Errors are grouped by the component that raises them. Name, page token and
//! field mask errors describe bad caller input; transaction and backend errors
//! describe failures of the store itself.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A resource name did not match the expected pattern.
    #[error(transparent)]
    Name(#[from] NameError),

    /// A page token could not be decoded or encoded.
    #[error(transparent)]
    PageToken(#[from] PageTokenError),

    /// An update mask referenced an unknown field.
    #[error(transparent)]
    FieldMask(#[from] FieldMaskError),

    /// Transaction errors
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns `true` if the error was caused by caller input rather than the store.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StorageError::Name(_)
                | StorageError::PageToken(PageTokenError::Invalid)
                | StorageError::FieldMask(_)
        )
    }
}

/// Errors produced while parsing resource names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("a valid name will be in the format of `{pattern}`")]
    InvalidFormat { pattern: String },
}

impl NameError {
    /// Builds the error for a name expected to follow `collection_ids`.
    pub fn invalid(collection_ids: &[&str]) -> Self {
        let pattern = collection_ids
            .iter()
            .map(|collection| format!("{collection}/*"))
            .collect::<Vec<_>>()
            .join("/");
        NameError::InvalidFormat { pattern }
    }
}

/// Errors produced by the page token codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageTokenError {
    /// Any decode failure. Deliberately carries no detail.
    #[error("invalid page_token provided")]
    Invalid,

    #[error("page token key must be 32 bytes, got {len}")]
    InvalidKeyLength { len: usize },

    #[error("failed to seal page token")]
    Seal,
}

/// Errors produced by the field-mask merger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldMaskError {
    #[error("unknown field path in update_mask: {path}")]
    UnknownPath { path: String },
}

/// Errors related to transactions.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// Transaction was already committed or rolled back.
    #[error("transaction no longer valid")]
    InvalidTransaction,

    /// Transaction was rolled back.
    #[error("transaction rolled back: {reason}")]
    RolledBack { reason: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}
