//! Repository implementations for all KeyHub entities.

pub mod admin;
pub mod auth_log;
pub mod license;

pub use admin::AdminRepository;
pub use auth_log::AuthLogRepository;
pub use license::LicenseRepository;
