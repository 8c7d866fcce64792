//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenCodec};
pub use password::Argon2PasswordService;
