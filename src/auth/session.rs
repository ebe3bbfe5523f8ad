//! JWT session management with silent refresh.
//!
//! `SessionManager` owns the access/refresh token pair, persists it
//! through an ordered list of [`TokenStore`] backends, and answers
//! "is the current caller authorized" before each protected request,
//! renewing the access token through the backend when it has expired.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, warn};

use super::claims;
use super::store::{FileTokenStore, KeyringStore, TokenStore, ACCESS_TOKEN, REFRESH_TOKEN};

/// Fallback-store TTL for the access token.
/// The token itself expires in minutes; one day bounds how long a stale
/// copy can linger in the file store.
const ACCESS_TTL_DAYS: i64 = 1;

/// Fallback-store TTL for the refresh token.
/// Matches the backend's SimpleJWT refresh lifetime.
const REFRESH_TTL_DAYS: i64 = 7;

/// Result of an authorization check. Computed per check, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authorized,
    Unauthorized,
}

/// Transport used to renew an access token.
///
/// `ApiClient` is the production implementation; tests substitute a stub
/// so refresh behavior can be exercised without a backend.
#[async_trait]
pub trait RefreshTransport: Send + Sync {
    /// Exchange a refresh token for a new access token.
    async fn refresh_access(&self, refresh_token: &str) -> Result<String>;
}

pub struct SessionManager {
    stores: Vec<Box<dyn TokenStore>>,
    transport: Arc<dyn RefreshTransport>,
}

impl SessionManager {
    /// Create a session manager over an explicit list of storage
    /// backends, tried in order on both read and write.
    pub fn new(stores: Vec<Box<dyn TokenStore>>, transport: Arc<dyn RefreshTransport>) -> Self {
        Self { stores, transport }
    }

    /// Create a session manager with the default backends: the OS
    /// keychain first, then a TTL-bearing file in the cache directory.
    pub fn with_default_stores(cache_dir: PathBuf, transport: Arc<dyn RefreshTransport>) -> Self {
        Self::new(
            vec![
                Box::new(KeyringStore::new()),
                Box::new(FileTokenStore::new(cache_dir)),
            ],
            transport,
        )
    }

    /// Persist a token pair, falling through to the next backend when one
    /// fails. Returns whether at least one backend accepted both tokens;
    /// never errors.
    pub fn store(&self, access: &str, refresh: &str) -> bool {
        for store in &self.stores {
            let wrote = store
                .set(ACCESS_TOKEN, access, Some(Duration::days(ACCESS_TTL_DAYS)))
                .and_then(|_| {
                    store.set(REFRESH_TOKEN, refresh, Some(Duration::days(REFRESH_TTL_DAYS)))
                });
            match wrote {
                Ok(()) => return true,
                Err(e) => warn!(error = %e, "Token store rejected write, trying next backend"),
            }
        }
        warn!("No token store accepted the credential pair");
        false
    }

    /// Read the access token, trying each backend in order.
    pub fn access(&self) -> Option<String> {
        self.read(ACCESS_TOKEN)
    }

    /// Read the refresh token, trying each backend in order.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN)
    }

    fn read(&self, key: &str) -> Option<String> {
        for store in &self.stores {
            match store.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Token store read failed, trying next backend"),
            }
        }
        None
    }

    /// Remove both tokens from every backend. Best-effort per backend:
    /// a failing keychain never stops the file store from being wiped.
    pub fn clear(&self) {
        for store in &self.stores {
            for key in [ACCESS_TOKEN, REFRESH_TOKEN] {
                if let Err(e) = store.remove(key) {
                    warn!(error = %e, key, "Failed to remove token from store");
                }
            }
        }
    }

    /// Check whether the caller is currently authorized, refreshing the
    /// access token if its embedded expiry has passed.
    ///
    /// Fails closed: no token or an undecodable token is `Unauthorized`.
    /// No network access happens unless the token has expired.
    pub async fn check_authorized(&self) -> SessionState {
        let Some(access) = self.access() else {
            debug!("No access token stored");
            return SessionState::Unauthorized;
        };

        match claims::is_expired(&access) {
            Ok(false) => SessionState::Authorized,
            Ok(true) => {
                debug!("Access token expired, attempting silent refresh");
                self.refresh().await
            }
            Err(e) => {
                warn!(error = %e, "Stored access token is malformed");
                SessionState::Unauthorized
            }
        }
    }

    /// Renew the access token using the stored refresh token.
    ///
    /// Any failure (no refresh token, network fault, backend rejection)
    /// degrades to `Unauthorized` without touching the stored tokens, so
    /// a later retry or explicit re-login is still possible.
    pub async fn refresh(&self) -> SessionState {
        let Some(refresh) = self.refresh_token() else {
            debug!("No refresh token stored");
            return SessionState::Unauthorized;
        };

        match self.transport.refresh_access(&refresh).await {
            Ok(access) => {
                if !self.store(&access, &refresh) {
                    warn!("Refreshed access token could not be persisted");
                }
                SessionState::Authorized
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                SessionState::Unauthorized
            }
        }
    }

    /// Attach the stored access token as a bearer credential, or pass the
    /// request through unmodified when none is stored.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.access() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
