//! Capability traits implemented by infrastructure crates.

pub mod liveness;

pub use liveness::LivenessSource;
