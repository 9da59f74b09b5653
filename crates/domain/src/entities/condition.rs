//! Gating predicates evaluated against an `EventContext`.
//!
//! Evaluation is total: a fact the caller did not supply (or supplied with the
//! wrong shape) makes the condition false instead of raising an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::Season;
use crate::entities::context::{ContextKey, EventContext, MerchantRank};

/// A single gating condition for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Condition {
    /// Player rank is at least `min`
    Rank { min: MerchantRank },
    /// Player gold is at least `min`
    Gold { min: i64 },
    /// Player reputation is at least `min`
    Reputation { min: f64 },
    /// Current season equals `required`
    Season { required: Season },
    /// Quest `quest_id` has been completed
    Quest { quest_id: String },
    /// Inventory holds at least the given quantity of every listed item
    Item { required: BTreeMap<String, u32> },
    /// The caller-supplied random draw falls below `probability`
    Random { probability: f64 },
    /// At least `min_days_passed` days have elapsed
    Time { min_days_passed: i64 },
    /// Shop level is at least `min`
    ShopLevel { min: i64 },
    /// AND (`require_all`) or OR composition of child conditions
    Compound {
        conditions: Vec<Condition>,
        require_all: bool,
    },
}

impl Condition {
    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Condition::Compound {
            conditions,
            require_all: true,
        }
    }

    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Condition::Compound {
            conditions,
            require_all: false,
        }
    }

    /// Evaluate this condition against the context.
    pub fn check(&self, ctx: &EventContext) -> bool {
        match self {
            Condition::Rank { min } => ctx.rank().is_some_and(|rank| rank >= *min),
            Condition::Gold { min } => ctx
                .integer(ContextKey::PlayerGold)
                .is_some_and(|gold| gold >= *min),
            Condition::Reputation { min } => ctx
                .float(ContextKey::PlayerReputation)
                .is_some_and(|reputation| reputation >= *min),
            Condition::Season { required } => ctx.season() == Some(*required),
            Condition::Quest { quest_id } => ctx
                .completed_quests()
                .is_some_and(|quests| quests.iter().any(|q| q == quest_id)),
            Condition::Item { required } => ctx.inventory().is_some_and(|inventory| {
                required
                    .iter()
                    .all(|(item, qty)| inventory.get(item).is_some_and(|held| held >= qty))
            }),
            Condition::Random { probability } => ctx
                .float(ContextKey::RandomValue)
                .is_some_and(|draw| draw < *probability),
            Condition::Time { min_days_passed } => ctx
                .integer(ContextKey::DaysPassed)
                .is_some_and(|days| days >= *min_days_passed),
            Condition::ShopLevel { min } => ctx
                .integer(ContextKey::ShopLevel)
                .is_some_and(|level| level >= *min),
            Condition::Compound {
                conditions,
                require_all,
            } => {
                if *require_all {
                    conditions.iter().all(|c| c.check(ctx))
                } else {
                    conditions.iter().any(|c| c.check(ctx))
                }
            }
        }
    }
}

/// Short-circuiting AND over a list of conditions. An empty list passes.
pub fn check_all(conditions: &[Condition], ctx: &EventContext) -> bool {
    conditions.iter().all(|c| c.check(ctx))
}
