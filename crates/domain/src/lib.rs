//! Merchant Tails event domain
//!
//! Pure types for the event scheduling and triggering engine: the simulated
//! calendar, event definitions and their schedules, gating conditions,
//! effects, and the results of firing events. Nothing here locks, logs or
//! draws random numbers; those concerns live in the engine crate.

pub mod aggregates;
pub mod calendar;
pub mod entities;
pub mod error;
pub mod ids;

pub use aggregates::{EventCategory, EventDefinition, EventPriority, Rarity, Rewards};
pub use calendar::{CalendarTime, Season, DAYS_PER_SEASON, DAYS_PER_YEAR, MAX_YEAR};
pub use entities::{
    check_all, Condition, ContextKey, ContextValue, Effect, EffectResult, EventContext,
    EventNotification, EventTriggerResult, ItemStack, MerchantRank, Schedule, UpcomingEvent,
    Weather, PAYDAY_CITIZENS,
};
pub use error::DomainError;
pub use ids::EventId;
