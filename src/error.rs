//! Application error types.
//!
//! These errors are serializable so a hosting shell can hand them to the UI
//! layer unchanged, and they carry enough context (status code, endpoint,
//! backend error key) for the query hooks to decide how to surface them.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned from services, hooks and the wizard.
///
/// All variants serialize to a structured JSON object for frontend consumption.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Local storage operation failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },

    /// Backend API request failed with a non-success status.
    #[error("Backend API error: {message}")]
    Api {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        /// Structured rejection key sent by the backend (`errorKey`).
        #[serde(skip_serializing_if = "Option::is_none")]
        error_key: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Session is not authenticated or not authorized (401/403).
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// A save or submit is already in flight.
    #[error("Operation in progress: {message}")]
    Busy { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a storage error with operation context.
    pub fn storage_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create a backend API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code: None,
            endpoint: None,
            error_key: None,
        }
    }

    /// Create a backend API error with status code and endpoint.
    pub fn api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
            error_key: None,
        }
    }

    /// Create a backend API error carrying a structured error key.
    pub fn api_rejected(
        error_key: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        let error_key = error_key.into();
        Self::Api {
            message: format!("Request rejected: {}", error_key),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
            error_key: Some(error_key),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error for a 401/403 response.
    pub fn authentication_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Check whether this error should send the user back to the login page.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status code of the failed request, if known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } | Self::Authentication { status_code, .. } => {
                *status_code
            }
            _ => None,
        }
    }

    /// Backend error key, if the backend sent one.
    pub fn error_key(&self) -> Option<&str> {
        match self {
            Self::Api { error_key, .. } => error_key.as_deref(),
            _ => None,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a busy error.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl PartialEq for AppError {
    fn eq(&self, other: &Self) -> bool {
        // Compares what the user would see.
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string()
            && self.status_code() == other.status_code()
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_status() {
            Self::api(format!("HTTP error: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::storage("disk full");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Storage\""));
        assert!(json.contains("disk full"));
    }

    #[test]
    fn test_api_error_full() {
        let err = AppError::api_full("Server error", 500, "/v1/applications/simplified/");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"status_code\":500"));
        assert!(json.contains("/v1/applications/simplified/"));
        assert!(!json.contains("error_key"));
    }

    #[test]
    fn test_api_rejected_keeps_error_key() {
        let err = AppError::api_rejected("batchInvalidDecisionDate", 406, "/v1/x/");
        assert_eq!(err.error_key(), Some("batchInvalidDecisionDate"));
        assert_eq!(err.status_code(), Some(406));
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(AppError::authentication_status("forbidden", 403).is_auth_failure());
        assert!(!AppError::network("offline").is_auth_failure());
    }

    #[test]
    fn test_equality_by_visible_fields() {
        let a = AppError::api_full("Server error", 500, "/v1/a/");
        let b = AppError::api_full("Server error", 500, "/v1/a/");
        let c = AppError::api_full("Server error", 502, "/v1/a/");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::invalid_input_field("Invalid decision date: x", "decision_date");
        assert_eq!(format!("{}", err), "Invalid input: Invalid decision date: x");
    }
}
