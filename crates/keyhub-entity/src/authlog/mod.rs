//! Authentication log entity.

pub mod model;

pub use model::{AuthLogWithContext, NewAuthLog};
