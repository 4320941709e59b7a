//! Liveness source implementations.

pub mod disabled;
pub mod http;

pub use disabled::DisabledLiveness;
pub use http::HttpLivenessSource;
