//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod store;

pub use auth::{AuthError, PasswordService, TokenCodec};
pub use cache::{Cache, CacheError, revoked_token_key, user_key};
pub use store::{NewUserRow, UserStore};
