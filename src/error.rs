//! Error types for the Anymailfinder node.
//!
//! Item-level failures carry the index of the input item that produced them,
//! so the batch executor can either abort with a precise location or turn
//! the failure into an error record paired with that item.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Node error types.
///
/// Each error variant includes a code that hosts can parse programmatically.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither a domain nor a company name was supplied for a lookup.
    #[error("Either domain or company name must be provided")]
    MissingIdentifier { item_index: usize },

    #[error("{message}")]
    Validation { item_index: usize, message: String },

    /// The (resource, operation) pair is not in the dispatch table.
    #[error("Operation '{operation}' is not supported for resource '{resource}'")]
    Unsupported {
        item_index: usize,
        resource: String,
        operation: String,
    },

    #[error("{message}")]
    Request {
        item_index: usize,
        status: Option<u16>,
        message: String,
    },

    #[error("Anymailfinder API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from Anymailfinder API: {0}")]
    InvalidResponse(String),

    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingIdentifier { .. } => "MISSING_REQUIRED_IDENTIFIER",
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            Error::Request { .. } => "REQUEST_ERROR",
            Error::Api { .. } => "API_ERROR",
            Error::InvalidResponse(_) => "INVALID_RESPONSE",
            Error::Parameter(_) => "PARAMETER_ERROR",
            Error::Credential(_) => "CREDENTIAL_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Http(_) => "HTTP_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }

    /// Shorthand for a validation failure on a given item.
    pub fn validation(item_index: usize, message: impl Into<String>) -> Self {
        Error::Validation {
            item_index,
            message: message.into(),
        }
    }

    /// Index of the input item this error belongs to, if known.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Error::MissingIdentifier { item_index }
            | Error::Validation { item_index, .. }
            | Error::Unsupported { item_index, .. }
            | Error::Request { item_index, .. } => Some(*item_index),
            _ => None,
        }
    }

    /// True for failures raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingIdentifier { .. } | Error::Validation { .. } | Error::Parameter(_)
        )
    }

    /// Attach an item index to an error.
    ///
    /// Parameter problems become validation errors, anything else becomes a
    /// request error. Errors that already carry an index are returned
    /// unchanged.
    pub fn at_item(self, item_index: usize) -> Self {
        if self.item_index().is_some() {
            return self;
        }
        match self {
            Error::Parameter(message) => Error::Validation {
                item_index,
                message,
            },
            Error::Api { status, .. } => Error::Request {
                item_index,
                status: Some(status),
                message: self.to_string(),
            },
            Error::Http(ref e) => Error::Request {
                item_index,
                status: e.status().map(|s| s.as_u16()),
                message: self.to_string(),
            },
            other => Error::Request {
                item_index,
                status: None,
                message: other.to_string(),
            },
        }
    }

    /// Convert to a JSON error envelope (includes full error details).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(ErrorResponse::from(self)).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "error": { "code": self.code() } })
        })
    }
}

/// Serializable error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let status = match error {
            Error::Request { status, .. } => *status,
            Error::Api { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            success: false,
            error: ErrorBody {
                code: error.code().to_string(),
                message: error.to_string(),
                item_index: error.item_index(),
                status,
            },
        }
    }
}
