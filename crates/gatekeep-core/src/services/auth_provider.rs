//! Login, verification and logout of bearer tokens.
//!
//! ```text
//!   [no token]    --login-->                      [valid]
//!   [valid]       --verify (live, not revoked)--> [valid]
//!   [valid]       --verify (expired or revoked)-> [rejected]
//!   [valid]       --logout-->                     [revoked]
//!   [revoked]     --verify-->                     [rejected]
//! ```

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{AccessToken, TokenClaims, mask_email};
use crate::error::UserError;
use crate::ports::{AuthError, PasswordService, TokenCodec};
use crate::services::{AdminPolicy, RevocationList, UserRepository};

/// Hashed once per provider so unknown emails pay for a verify too.
const TIMING_PASSWORD: &str = "gatekeep-timing-equalizer";

/// Authentication service tying users, tokens and revocation together.
#[derive(Clone)]
pub struct AuthProvider {
    users: UserRepository,
    codec: Arc<dyn TokenCodec>,
    passwords: Arc<dyn PasswordService>,
    revocations: RevocationList,
    admin_policy: Arc<dyn AdminPolicy>,
    timing_hash: Option<Arc<str>>,
}

impl AuthProvider {
    pub fn new(
        users: UserRepository,
        codec: Arc<dyn TokenCodec>,
        passwords: Arc<dyn PasswordService>,
        revocations: RevocationList,
        admin_policy: Arc<dyn AdminPolicy>,
    ) -> Self {
        let timing_hash = match passwords.hash(TIMING_PASSWORD) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not hash the timing password");
                None
            }
        };

        Self {
            users,
            codec,
            passwords,
            revocations,
            admin_policy,
            timing_hash,
        }
    }

    /// Check credentials and mint a token.
    ///
    /// Unknown emails and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let user = match self.users.fetch(email).await {
            Ok(user) => user,
            Err(UserError::NotFound(_)) => {
                tracing::info!(user_email = %mask_email(email), "Login for unknown account");
                self.burn_verify(password);
                return Err(AuthError::InvalidCredentials);
            }
            Err(UserError::Store(e)) => return Err(AuthError::Store(e)),
            Err(UserError::Cache(e)) => return Err(AuthError::Cache(e)),
            Err(e) => return Err(AuthError::HashingError(e.to_string())),
        };

        let Some(hash) = user.password_hash.as_deref() else {
            tracing::warn!(user_email = %mask_email(email), "User record has no password hash");
            self.burn_verify(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(password, hash)? {
            tracing::info!(user_email = %mask_email(email), "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let is_admin = self.admin_policy.is_admin(&user.email);
        let now = Utc::now();
        let token = self.codec.issue(&user.email, is_admin, now)?;
        let claims = self.codec.verify(&token, now)?;

        tracing::info!(user_email = %mask_email(&user.email), is_admin, "User logged in");
        Ok(AccessToken { token, claims })
    }

    /// Validate a presented token: signature and expiry first, then revocation.
    pub async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.codec.verify(token, Utc::now())?;

        if self.revocations.is_revoked(token).await {
            tracing::info!(user_email = %mask_email(&claims.email), "Rejected revoked token");
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Revoke `token` for the rest of its lifetime.
    ///
    /// Idempotent. Tokens that no longer verify (expired, malformed) are
    /// already rejected, so nothing is recorded for them.
    pub async fn logout(&self, token: &str, email: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let claims = match self.codec.verify(token, now) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Logout with a token that no longer verifies");
                return Ok(());
            }
        };

        let ttl = claims.remaining(now).to_std().unwrap_or_default();
        self.revocations.revoke(token, email, ttl).await?;
        Ok(())
    }

    /// Run a password verify whose outcome is discarded, so a rejected login
    /// costs the same whether or not the account exists.
    fn burn_verify(&self, password: &str) {
        if let Some(hash) = self.timing_hash.as_deref() {
            let _ = self.passwords.verify(password, hash);
        }
    }
}
