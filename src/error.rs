//! Error types for the reservation admin client

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Non-2xx response from the backend
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        AppError::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401)) || matches!(self, AppError::Authentication(_))
    }

    /// Message suitable for a toast notification
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            AppError::Http(e) if e.is_connect() => "Unable to reach the server".to_string(),
            AppError::Http(_) => "Network error".to_string(),
            AppError::Decode(_) => "Unexpected response from the server".to_string(),
            AppError::Validation(errors) => first_validation_message(errors)
                .unwrap_or_else(|| "Please check the form for errors".to_string()),
            AppError::Upload(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> Option<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
}

/// Error body shapes the backend is known to send
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: NestedError },
    Flat { error: String },
    Message { message: String },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

/// Extract a human readable message from a failed response body.
///
/// Tries `{error:{message}}`, `{error:"..."}` and `{message:"..."}` in that
/// order. When the extracted string is itself JSON, it is parsed once more
/// with the same rules. Falls back to the raw body text.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("Request failed with status {}", status);
    }

    match message_from_json(trimmed) {
        Some(message) => match message_from_json(message.trim()) {
            Some(inner) => inner,
            None => message,
        },
        None => trimmed.to_string(),
    }
}

fn message_from_json(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    match serde_json::from_value::<ErrorBody>(value).ok()? {
        ErrorBody::Nested { error } => Some(error.message),
        ErrorBody::Flat { error } => Some(error),
        ErrorBody::Message { message } => Some(message),
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
