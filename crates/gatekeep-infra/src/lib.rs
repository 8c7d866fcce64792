//! # Gatekeep Infrastructure
//!
//! Concrete implementations of the ports defined in `gatekeep-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL user store via SeaORM
//! - `auth` - JWT token codec + Argon2 password hashing
//! - `redis` - Redis cache

pub mod cache;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::InMemoryUserStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenCodec};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, SeaOrmUserStore};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
