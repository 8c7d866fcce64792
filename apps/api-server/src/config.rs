//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use gatekeep_infra::JwtConfig;
#[cfg(feature = "postgres")]
use gatekeep_infra::DatabaseConfig;
#[cfg(feature = "redis")]
use gatekeep_infra::RedisConfig;

/// Default trusted suffix granting the admin flag.
const DEFAULT_ADMIN_SUFFIX: &str = "@test.com";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub admin_email_suffix: String,
    /// `None` caches user records indefinitely.
    pub user_cache_ttl: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
            jwt: JwtConfig::from_env(),
            admin_email_suffix: env::var("ADMIN_EMAIL_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_ADMIN_SUFFIX.to_string()),
            user_cache_ttl: env::var("USER_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
