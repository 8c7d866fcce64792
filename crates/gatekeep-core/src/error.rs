//! Domain-level error types.

use thiserror::Error;

use crate::ports::CacheError;

/// Relational store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
}

/// User repository errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("account already exists: {0}")]
    Duplicate(String),

    #[error("account does not exist: {0}")]
    NotFound(String),

    #[error("Transient store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Transient cache failure: {0}")]
    Cache(#[from] CacheError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
