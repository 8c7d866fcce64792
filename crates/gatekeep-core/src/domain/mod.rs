//! Domain entities - the core business objects.

mod token;
mod user;

pub use token::{AccessToken, TokenClaims};
pub use user::{NewUser, User, mask_email};
