//! Bearer credentials and their lifecycle.
//!
//! A token is issued at sign-in, refreshed once it expires, and invalidated
//! at sign-out or when the backend rejects it. `AlumniApi` only ever talks to
//! the [`CredentialProvider`] trait, so the mobile host can back it with the
//! platform keychain.

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use crate::error::AuthError;

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    secret: String,
    expires_at: Option<SystemTime>,
}

impl AuthToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, at: SystemTime) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer tokens for authenticated calls.
pub trait CredentialProvider: Send + Sync {
    /// Current usable token.
    fn acquire(&self) -> Result<AuthToken, AuthError>;

    /// Exchange the current token for a fresh one.
    fn refresh(&self) -> Result<AuthToken, AuthError>;

    /// Drop the current token; later `acquire` calls fail until a new one
    /// is issued.
    fn invalidate(&self);
}

/// A single fixed token, e.g. a development key.
#[derive(Debug)]
pub struct StaticCredentials {
    token: RwLock<Option<AuthToken>>,
}

impl StaticCredentials {
    pub fn new(token: AuthToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn acquire(&self) -> Result<AuthToken, AuthError> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AuthError::SignedOut)
    }

    fn refresh(&self) -> Result<AuthToken, AuthError> {
        Err(AuthError::NotRefreshable)
    }

    fn invalidate(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

type Refresher = Box<dyn Fn(&AuthToken) -> Result<AuthToken, AuthError> + Send + Sync>;

/// Signed-in session whose token is swapped by an injected refresher when
/// it expires.
pub struct SessionCredentials {
    current: RwLock<Option<AuthToken>>,
    refresher: Option<Refresher>,
}

impl SessionCredentials {
    /// A session with no token yet.
    pub fn signed_out() -> Self {
        Self {
            current: RwLock::new(None),
            refresher: None,
        }
    }

    pub fn with_refresher<F>(mut self, refresher: F) -> Self
    where
        F: Fn(&AuthToken) -> Result<AuthToken, AuthError> + Send + Sync + 'static,
    {
        self.refresher = Some(Box::new(refresher));
        self
    }

    pub fn sign_in(&self, token: AuthToken) {
        log::debug!("session signed in");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn sign_out(&self) {
        log::debug!("session signed out");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn acquire_at(&self, now: SystemTime) -> Result<AuthToken, AuthError> {
        let token = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AuthError::SignedOut)?;
        if token.is_expired_at(now) {
            log::debug!("session token expired, refreshing");
            return self.refresh();
        }
        Ok(token)
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("signed_in", &self.is_signed_in())
            .field("refreshable", &self.refresher.is_some())
            .finish()
    }
}

impl CredentialProvider for SessionCredentials {
    fn acquire(&self) -> Result<AuthToken, AuthError> {
        self.acquire_at(SystemTime::now())
    }

    fn refresh(&self) -> Result<AuthToken, AuthError> {
        let refresher = self.refresher.as_ref().ok_or(AuthError::NotRefreshable)?;
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let current = slot.as_ref().ok_or(AuthError::SignedOut)?;
        match refresher(current) {
            Ok(fresh) => {
                *slot = Some(fresh.clone());
                Ok(fresh)
            }
            Err(e) => {
                log::warn!("token refresh failed: {e}");
                *slot = None;
                Err(e)
            }
        }
    }

    fn invalidate(&self) {
        self.sign_out();
    }
}
