//! # keyhub-service
//!
//! Business logic for KeyHub. The [`activation`] module owns the license
//! lifecycle state machine and is the sole writer of activation state;
//! everything else is admin-surface orchestration on top of the
//! repositories.

pub mod account;
pub mod activation;
pub mod license;
pub mod liveness;
pub mod stats;
