//! Infrastructure implementations.
//!
//! Contains port traits, their system implementations, and settings loading.

pub mod clock;
pub mod ports;
pub mod settings;
