//! Token revocation on top of the cache.
//!
//! A token is revoked while a `token:<raw token>` entry exists. Entries are
//! written with a TTL covering the token's remaining lifetime and are never
//! deleted explicitly.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::mask_email;
use crate::ports::{Cache, CacheError, revoked_token_key};

/// Cache-backed revocation (blacklist) of access tokens.
#[derive(Clone)]
pub struct RevocationList {
    cache: Arc<dyn Cache>,
}

impl RevocationList {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Record `token` as revoked for `ttl`. Revoking twice only refreshes the entry.
    pub async fn revoke(&self, token: &str, email: &str, ttl: Duration) -> Result<(), CacheError> {
        let key = revoked_token_key(token);
        let ttl = ttl.max(Duration::from_secs(1));

        self.cache
            .set(&key, email, Some(ttl))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    user_email = %mask_email(email),
                    error = %e,
                    "Failed to record token revocation"
                );
            })?;

        tracing::debug!(user_email = %mask_email(email), ttl_secs = ttl.as_secs(), "Token revoked");
        Ok(())
    }

    /// Whether `token` has been revoked.
    ///
    /// Fails open: a cache error reads as "not revoked", so revocation is
    /// not enforced while the cache is unavailable.
    pub async fn is_revoked(&self, token: &str) -> bool {
        match self.cache.get(&revoked_token_key(token)).await {
            Ok(Some(value)) => !value.is_empty(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Revocation check failed, treating token as not revoked"
                );
                false
            }
        }
    }
}
