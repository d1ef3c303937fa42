//! Error types for the alumni API boundary.
//!
//! # Design
//! Two failure kinds reach this module: transport failures (the request never
//! produced a response) and application failures (a non-success status, with
//! an optional `{"message": ...}` body). Both carry enough text for the UI to
//! show directly via [`ApiError::user_message`].

use thiserror::Error;

/// Shown when neither the backend nor the transport gave anything better.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors produced while building requests, executing them, or parsing
/// responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with an unexpected status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never completed (DNS, connect, reset, TLS...).
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    TimedOut,

    #[error("request cancelled")]
    Cancelled,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A local file could not be read for upload.
    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Human-readable text suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Transport(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ApiError::TimedOut => "The server took too long to respond.".to_string(),
            ApiError::Cancelled => "The request was cancelled.".to_string(),
            ApiError::Io(_) => "The selected file could not be read.".to_string(),
            ApiError::Auth(_) => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Deserialization(_) | ApiError::Serialization(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// Status code for application failures, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures of a [`crate::auth::CredentialProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no active session")]
    SignedOut,

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("credentials cannot be refreshed")]
    NotRefreshable,
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API_BASE_URL is not set")]
    MissingBaseUrl,

    #[error("invalid base url `{0}`: expected http:// or https://")]
    InvalidBaseUrl(String),
}
