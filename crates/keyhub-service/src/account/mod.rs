//! Admin account service.

pub mod service;

pub use service::{AccountService, CreateAdminRequest, UpdateAdminRequest};
