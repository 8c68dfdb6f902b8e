//! Error types for the catalog API.
//!
//! Every handler returns [`ApiError`]. Each variant carries a stable [`Code`]
//! that transports map onto their own status vocabulary.
//!
//! # Error Mapping
//!
//! | Storage Error | Code |
//! |--------------|------|
//! | Name | INVALID_ARGUMENT |
//! | PageToken | INVALID_ARGUMENT |
//! | FieldMask | INVALID_ARGUMENT |
//! | Transaction | INTERNAL |
//! | Backend | INTERNAL |

use std::fmt;

use chacer_persistence::error::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Stable status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Internal,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem with a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `account.displayName`.
    pub field: String,
    /// The rejected value, rendered as a string.
    pub value: String,
    pub description: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Errors returned by catalog handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid argument")]
    InvalidArgument { violations: Vec<FieldViolation> },

    #[error("not found")]
    NotFound { name: String },

    #[error("already exists")]
    AlreadyExists { name: String },

    #[error("{message}")]
    FailedPrecondition { message: String },

    #[error("internal error")]
    Internal { message: String },
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(name: impl Into<String>) -> Self {
        ApiError::NotFound { name: name.into() }
    }

    pub fn already_exists(name: impl Into<String>) -> Self {
        ApiError::AlreadyExists { name: name.into() }
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        ApiError::FailedPrecondition {
            message: message.into(),
        }
    }

    /// Wraps a single violation.
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ApiError::InvalidArgument {
            violations: vec![FieldViolation::new(field, value, description)],
        }
    }

    pub fn code(&self) -> Code {
        match self {
            ApiError::InvalidArgument { .. } => Code::InvalidArgument,
            ApiError::NotFound { .. } => Code::NotFound,
            ApiError::AlreadyExists { .. } => Code::AlreadyExists,
            ApiError::FailedPrecondition { .. } => Code::FailedPrecondition,
            ApiError::Internal { .. } => Code::Internal,
        }
    }

    /// Field violations, empty unless this is an invalid-argument error.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ApiError::InvalidArgument { violations } => violations,
            _ => &[],
        }
    }

    /// Renders the error as a client-facing status.
    ///
    /// Internal details never leave the process; they are logged where the
    /// error is created.
    pub fn to_status(&self) -> Status {
        Status {
            code: self.code(),
            message: self.to_string(),
            violations: self.violations().to_vec(),
        }
    }
}

/// Wire form of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub code: Code,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

/// Errors raised while assembling the application state at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if !err.is_invalid_argument() {
            error!(error = %err, "storage operation failed");
            return ApiError::Internal {
                message: err.to_string(),
            };
        }
        let field = match &err {
            StorageError::PageToken(_) => "page_token",
            StorageError::FieldMask(_) => "update_mask",
            _ => "name",
        };
        ApiError::invalid_field(field, "", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chacer_persistence::error::{BackendError, FieldMaskError, NameError, PageTokenError};

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::not_found("accounts/acme").code(), Code::NotFound);
        assert_eq!(ApiError::already_exists("accounts/acme").code(), Code::AlreadyExists);
        assert_eq!(
            ApiError::failed_precondition("account is already active").code(),
            Code::FailedPrecondition
        );
        assert_eq!(Code::InvalidArgument.to_string(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_storage_input_errors_are_invalid_argument() {
        let err: ApiError = StorageError::from(NameError::invalid(&["accounts"])).into();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.violations()[0].field, "name");

        let err: ApiError = StorageError::from(FieldMaskError::UnknownPath {
            path: "uid".to_string(),
        })
        .into();
        assert_eq!(err.violations()[0].field, "update_mask");
        assert_eq!(
            err.violations()[0].description,
            "unknown field path in update_mask: uid"
        );
    }

    #[test]
    fn test_page_token_errors() {
        let err: ApiError = StorageError::from(PageTokenError::Invalid).into();
        assert_eq!(err.violations()[0].field, "page_token");
        assert_eq!(err.violations()[0].description, "invalid page_token provided");

        let err: ApiError = StorageError::from(PageTokenError::InvalidKeyLength { len: 16 }).into();
        assert_eq!(err.code(), Code::Internal);
    }

    #[test]
    fn test_backend_errors_are_internal_and_opaque() {
        let err: ApiError = StorageError::from(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: "disk I/O error".to_string(),
            source: None,
        })
        .into();
        assert_eq!(err.code(), Code::Internal);

        let status = err.to_status();
        assert_eq!(status.message, "internal error");
        assert!(!status.message.contains("disk"));
    }

    #[test]
    fn test_init_error_lists_every_problem() {
        let err = InitError::Config(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "invalid configuration: a; b");
    }

    #[test]
    fn test_status_serialization() {
        let err = ApiError::invalid_field(
            "page_size",
            "-1",
            "page_size must be between 0 and 500 inclusive",
        );
        let json = serde_json::to_value(err.to_status()).unwrap();
        assert_eq!(json["code"], "INVALID_ARGUMENT");
        assert_eq!(json["violations"][0]["field"], "page_size");

        let json = serde_json::to_value(ApiError::not_found("x").to_status()).unwrap();
        assert!(json.get("violations").is_none());
    }
}
