//! Relational store port.

use async_trait::async_trait;

use crate::domain::User;
use crate::error::StoreError;

/// Row to insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Tabular user store (PostgreSQL, in-memory).
///
/// `insert` and `delete_by_email` run inside a transaction scoped to the
/// call; implementations roll back before returning an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup, password hash included.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All users in a stable order, without password hashes.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a user. A taken email yields [`StoreError::UniqueViolation`].
    async fn insert(&self, row: NewUserRow) -> Result<User, StoreError>;

    /// Delete by email, returning the number of rows affected.
    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError>;
}
