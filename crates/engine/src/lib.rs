//! Merchant Tails event engine.
//!
//! Decides which game-world events fire, when, and with what effects.
//!
//! ## Structure
//!
//! - `registry/` - Event catalog, priority dispatch, follow-up chaining and look-ahead queries
//! - `frequency/` - Cooldowns and probability rolls for the random event pool
//! - `infrastructure/` - Clock and random ports, settings
//! - `catalog` - Built-in Merchant Tails events
//! - `app` - Engine composition and the daily tick

pub mod app;
pub mod catalog;
pub mod frequency;
pub mod infrastructure;
pub mod registry;

/// Scenario tests over the full engine.
#[cfg(test)]
mod e2e_tests;

pub use app::{EventEngine, TickReport};
pub use frequency::{FrequencyConfig, FrequencyEngine, GamePhase};
pub use infrastructure::settings::{EngineSettings, SettingsError};
pub use registry::{EventRegistry, Subscriber, MAX_FOLLOW_UP_DEPTH};
