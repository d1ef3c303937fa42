//! Client configuration.
//!
//! `API_BASE_URL` is the only environment variable the boundary reads.
//! Timeouts are set in code.

use std::time::Duration;

use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "API_BASE_URL";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to JSON requests. `None` disables the deadline.
    pub request_timeout: Option<Duration>,
    /// Applied to media uploads.
    pub upload_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            upload_timeout: Some(DEFAULT_UPLOAD_TIMEOUT),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| ConfigError::MissingBaseUrl)?;
        Self::new(&base_url)
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_upload_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.upload_timeout = timeout;
        self
    }
}
