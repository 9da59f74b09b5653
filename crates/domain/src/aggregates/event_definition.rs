//! EventDefinition aggregate - a game-world event and its triggering rules
//!
//! A definition is authored once (usually from content data) and registered
//! with the engine. After registration only the active flag changes.
//!
//! # Triggering Model
//!
//! - **Scheduled**: a `Schedule` decides the calendar day, conditions gate it
//! - **Pooled**: `Random` category or `Schedule::Random` events are rolled by
//!   the frequency engine using the event's `Rarity`
//! - **Manual**: the game can trigger any event by id, bypassing both

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::Season;
use crate::entities::{check_all, Condition, Effect, EventContext, Schedule};
use crate::ids::EventId;

// ============================================================================
// Classification
// ============================================================================

/// Broad category of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    #[default]
    Regular,
    Seasonal,
    Major,
    Random,
}

/// Dispatch priority; higher priorities fire first on the same tick
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// How rare a pooled event is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Zero-based position from Common (0) to Legendary (4).
    pub fn index(&self) -> usize {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    pub fn all() -> [Rarity; 5] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

/// Rewards granted when an event completes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    pub gold: i64,
    pub reputation: i64,
    #[serde(default)]
    pub items: Vec<String>,
    pub experience: i64,
}

// ============================================================================
// EventDefinition
// ============================================================================

/// A registered game-world event.
///
/// # Invariants
///
/// - `id` is unique within a registry (enforced on registration)
/// - Top-level `conditions` are combined with AND
/// - `follow_up_ids` fire in declared order after this event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    id: EventId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: EventCategory,
    #[serde(default)]
    priority: EventPriority,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    schedule: Option<Schedule>,
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    effects: Vec<Effect>,
    #[serde(default)]
    rewards: Option<Rewards>,
    #[serde(default)]
    follow_up_ids: Vec<EventId>,
    #[serde(default)]
    notification_lead_days: u32,
    #[serde(default)]
    rarity: Option<Rarity>,
}

fn default_active() -> bool {
    true
}

impl EventDefinition {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an active event with no schedule, conditions or effects.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        category: EventCategory,
        priority: EventPriority,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category,
            priority,
            active: true,
            schedule: None,
            conditions: Vec::new(),
            effects: Vec::new(),
            rewards: None,
            follow_up_ids: Vec::new(),
            notification_lead_days: 0,
            rarity: None,
        }
    }

    /// A normal-priority seasonal event on a fixed day of `season`.
    pub fn seasonal(id: EventId, name: impl Into<String>, season: Season, day: u8) -> Self {
        Self::new(id, name, EventCategory::Seasonal, EventPriority::Normal).with_schedule(
            Schedule::Seasonal {
                season,
                day_of_season: day,
            },
        )
    }

    // =========================================================================
    // Identity
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &EventId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn category(&self) -> EventCategory {
        self.category
    }

    #[inline]
    pub fn priority(&self) -> EventPriority {
        self.priority
    }

    // =========================================================================
    // Triggering
    // =========================================================================

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    #[inline]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[inline]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    #[inline]
    pub fn rewards(&self) -> Option<&Rewards> {
        self.rewards.as_ref()
    }

    #[inline]
    pub fn follow_up_ids(&self) -> &[EventId] {
        &self.follow_up_ids
    }

    /// Days of advance notice before the event; 0 means no notification.
    #[inline]
    pub fn notification_lead_days(&self) -> u32 {
        self.notification_lead_days
    }

    /// Rarity used by the frequency engine, defaulting to Common.
    pub fn rarity(&self) -> Rarity {
        self.rarity.unwrap_or_default()
    }

    /// Whether the event is rolled by the frequency engine instead of the calendar.
    ///
    /// A calendar schedule always wins: a Random-category event with a
    /// Monthly, Seasonal or OneTime schedule fires from the calendar only.
    pub fn is_pooled(&self) -> bool {
        match &self.schedule {
            Some(schedule) => schedule.is_random(),
            None => self.category == EventCategory::Random,
        }
    }

    /// AND over the top-level conditions. No conditions means the event passes.
    pub fn check_conditions(&self, ctx: &EventContext) -> bool {
        check_all(&self.conditions, ctx)
    }

    /// Toggle whether the event participates in scheduling.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = Some(rewards);
        self
    }

    pub fn with_follow_up(mut self, id: EventId) -> Self {
        self.follow_up_ids.push(id);
        self
    }

    pub fn with_follow_ups(mut self, ids: Vec<EventId>) -> Self {
        self.follow_up_ids = ids;
        self
    }

    pub fn with_notification_lead_days(mut self, days: u32) -> Self {
        self.notification_lead_days = days;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
