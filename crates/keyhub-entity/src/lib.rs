//! # keyhub-entity
//!
//! Domain entity models for KeyHub: licenses and their lifecycle state
//! machine, the append-only authentication log, and admin accounts.

pub mod admin;
pub mod authlog;
pub mod license;
