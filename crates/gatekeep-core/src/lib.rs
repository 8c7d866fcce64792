//! # Gatekeep Core
//!
//! The domain layer of Gatekeep: user records, signed access tokens and
//! their revocation. Infrastructure (cache, relational store, signing,
//! hashing) is reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{StoreError, UserError};
pub use services::{AdminPolicy, AuthProvider, EmailSuffixPolicy, RevocationList, UserRepository};
