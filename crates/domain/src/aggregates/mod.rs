//! Aggregate roots - domain objects that own their related data
//!
//! An aggregate keeps its fields private, is built with `::new()` plus
//! `with_*` builders, and exposes behavior through methods.

mod event_definition;

pub use event_definition::{EventCategory, EventDefinition, EventPriority, Rarity, Rewards};
