//! Services orchestrating the ports: cached user access, token
//! revocation and the login/verify/logout cycle.

mod admin_policy;
mod auth_provider;
mod revocation;
mod user_repository;

#[cfg(test)]
pub(crate) mod testing;

pub use admin_policy::{AdminPolicy, EmailSuffixPolicy};
pub use auth_provider::AuthProvider;
pub use revocation::RevocationList;
pub use user_repository::UserRepository;
