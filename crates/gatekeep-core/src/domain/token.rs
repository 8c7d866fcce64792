use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::AuthError;

/// Claims signed into an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub issuer: String,
    /// Subject email.
    pub email: String,
    pub is_admin: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Fails with [`AuthError::Unauthorized`] unless the subject is an admin.
    pub fn ensure_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> chrono::TimeDelta {
        (self.expires_at - now).max(chrono::TimeDelta::zero())
    }
}

/// A freshly minted bearer token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub claims: TokenClaims,
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }
}
