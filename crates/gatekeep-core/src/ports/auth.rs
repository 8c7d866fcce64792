//! Authentication and authorization ports.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::TokenClaims;
use crate::error::StoreError;
use crate::ports::CacheError;

/// Signs and verifies access tokens.
///
/// Implementations are pure: revocation is layered on top by the caller.
pub trait TokenCodec: Send + Sync {
    /// Mint a token for `email` that expires `lifetime()` after `now`.
    fn issue(&self, email: &str, is_admin: bool, now: DateTime<Utc>) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry as of `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn lifetime(&self) -> TimeDelta;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong password or unknown email; the two are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("not permitted to perform this operation")]
    Unauthorized,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Transient store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Transient cache failure: {0}")]
    Cache(#[from] CacheError),
}
