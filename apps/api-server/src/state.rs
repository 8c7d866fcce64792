//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use gatekeep_core::ports::{Cache, PasswordService, TokenCodec, UserStore};
use gatekeep_core::services::AdminPolicy;
use gatekeep_core::{AuthProvider, EmailSuffixPolicy, RevocationList, UserRepository};
use gatekeep_infra::{Argon2PasswordService, InMemoryCache, InMemoryUserStore, JwtTokenCodec};

use crate::config::AppConfig;

/// Shared application state. Cloning shares the underlying handles.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthProvider,
    pub users: UserRepository,
}

/// The injected collaborators behind [`AppState`].
pub struct Ports {
    pub cache: Arc<dyn Cache>,
    pub store: Arc<dyn UserStore>,
    pub passwords: Arc<dyn PasswordService>,
    pub codec: Arc<dyn TokenCodec>,
    pub admin_policy: Arc<dyn AdminPolicy>,
}

impl AppState {
    /// Wire the services from explicit collaborators.
    pub fn from_ports(ports: Ports, user_cache_ttl: Option<Duration>) -> Self {
        let users = UserRepository::new(ports.store, ports.cache.clone(), ports.passwords.clone())
            .with_cache_ttl(user_cache_ttl);

        let auth = AuthProvider::new(
            users.clone(),
            ports.codec,
            ports.passwords,
            RevocationList::new(ports.cache),
            ports.admin_policy,
        );

        Self { auth, users }
    }

    /// Build the application state with the configured backends,
    /// falling back to in-memory implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let ports = Ports {
            cache: build_cache(config).await,
            store: build_store(config).await,
            passwords: Arc::new(Argon2PasswordService::new()),
            codec: Arc::new(JwtTokenCodec::new(config.jwt.clone())),
            admin_policy: Arc::new(EmailSuffixPolicy::new(config.admin_email_suffix.clone())),
        };

        tracing::info!(
            admin_suffix = %config.admin_email_suffix,
            "Application state initialized"
        );

        Self::from_ports(ports, config.user_cache_ttl)
    }
}

#[cfg(feature = "redis")]
async fn build_cache(config: &AppConfig) -> Arc<dyn Cache> {
    use gatekeep_infra::RedisCache;

    match &config.redis {
        Some(redis_config) => match RedisCache::new(redis_config.clone()).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Using in-memory cache; revocations will not be shared.",
                    e
                );
                Arc::new(InMemoryCache::new())
            }
        },
        None => {
            tracing::warn!("REDIS_URL not set. Using in-memory cache.");
            Arc::new(InMemoryCache::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn build_cache(_config: &AppConfig) -> Arc<dyn Cache> {
    tracing::info!("Running without redis feature - using in-memory cache");
    Arc::new(InMemoryCache::new())
}

#[cfg(feature = "postgres")]
async fn build_store(config: &AppConfig) -> Arc<dyn UserStore> {
    use gatekeep_infra::SeaOrmUserStore;

    match &config.database {
        Some(db_config) => match db_config.connect().await {
            Ok(conn) => {
                Arc::new(SeaOrmUserStore::new(conn).with_query_timeout(db_config.query_timeout))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryUserStore::new())
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            Arc::new(InMemoryUserStore::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_store(_config: &AppConfig) -> Arc<dyn UserStore> {
    tracing::info!("Running without postgres feature - using in-memory store");
    Arc::new(InMemoryUserStore::new())
}
