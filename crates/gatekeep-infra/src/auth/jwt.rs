//! JWT token codec implementation (HS256).

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use gatekeep_core::domain::TokenClaims;
use gatekeep_core::ports::{AuthError, TokenCodec};

const DEFAULT_ISSUER: &str = "icm";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;
/// One year.
const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// JWT codec configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing key. Empty means no key is available.
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if secret.is_empty() {
            tracing::error!(
                "SECURITY: JWT_SECRET is not set; logins will fail until a signing key is configured."
            );
        }

        Self {
            secret,
            expiration_hours: parse_expiration_hours(std::env::var("JWT_EXPIRATION_HOURS").ok()),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }
}

/// Hours in `1..=MAX_EXPIRATION_HOURS`, otherwise the 24h default.
fn parse_expiration_hours(raw: Option<String>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_EXPIRATION_HOURS;
    };

    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_EXPIRATION_HOURS).contains(&hours) => hours,
        _ => {
            tracing::warn!(
                value = %raw,
                default = DEFAULT_EXPIRATION_HOURS,
                "JWT_EXPIRATION_HOURS out of range, using default"
            );
            DEFAULT_EXPIRATION_HOURS
        }
    }
}

/// Wire format of the claim set.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    email: String,
    #[serde(rename = "isAdmin")]
    is_admin: bool,
    exp: i64, // expiration timestamp
    iat: i64, // issued at
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT-based token codec.
///
/// Expiry is checked against the caller's clock with no leeway, so a token
/// is valid up to and including its `exp` second.
pub struct JwtTokenCodec {
    keys: Option<Keys>,
    /// `None` when `expiration_hours` is not a positive, representable span.
    lifetime: Option<TimeDelta>,
    config: JwtConfig,
}

impl JwtTokenCodec {
    pub fn new(config: JwtConfig) -> Self {
        let keys = (!config.secret.is_empty()).then(|| Keys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        });

        let lifetime =
            TimeDelta::try_hours(config.expiration_hours).filter(|d| *d > TimeDelta::zero());
        if lifetime.is_none() {
            tracing::error!(
                expiration_hours = config.expiration_hours,
                "Token lifetime out of range; tokens cannot be issued"
            );
        }

        Self {
            keys,
            lifetime,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| AuthError::InvalidToken(format!("timestamp out of range: {secs}")))
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, email: &str, is_admin: bool, now: DateTime<Utc>) -> Result<String, AuthError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Signing("signing key is not configured".to_string()))?;

        let exp = self
            .lifetime
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims {
            iss: self.config.issuer.clone(),
            sub: email.to_string(),
            email: email.to_string(),
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::InvalidToken("signing key is not configured".to_string()))?;

        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is checked below against `now`.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let claims = data.claims;

        if now.timestamp() > claims.exp {
            return Err(AuthError::InvalidToken("token has expired".to_string()));
        }

        Ok(TokenClaims {
            issuer: claims.iss,
            email: claims.email,
            is_admin: claims.is_admin,
            issued_at: Self::timestamp(claims.iat)?,
            expires_at: Self::timestamp(claims.exp)?,
        })
    }

    fn lifetime(&self) -> TimeDelta {
        self.lifetime.unwrap_or_default()
    }
}
