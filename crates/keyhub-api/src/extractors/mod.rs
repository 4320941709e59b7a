//! Request extractors.

pub mod auth;
pub mod client_ip;
pub mod pagination;

pub use auth::AuthAdmin;
pub use client_ip::ClientIp;
pub use pagination::PaginationParams;
