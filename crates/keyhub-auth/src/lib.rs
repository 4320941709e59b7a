//! # keyhub-auth
//!
//! Authentication primitives for the KeyHub admin surface: JWT access and
//! refresh tokens, and Argon2id password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::PasswordHasher;
