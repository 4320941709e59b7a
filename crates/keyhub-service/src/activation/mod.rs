//! The license activation engine.

pub mod engine;

pub use engine::ActivationEngine;
