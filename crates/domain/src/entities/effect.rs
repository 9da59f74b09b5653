//! Event effects
//!
//! Effects describe the change an event makes to the world. Applying one is
//! deterministic and side-effect free: the result lists the changes under
//! stable string keys and the owning game systems carry them out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::entities::context::EventContext;

/// Number of citizens paid by a payday
pub const PAYDAY_CITIZENS: i64 = 100;

/// Weather a weather effect can impose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Rainy,
    Stormy,
    Snowy,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Stormy => "stormy",
            Weather::Snowy => "snowy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quantity of one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Outcome of applying one effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectResult {
    pub success: bool,
    pub changes: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EffectResult {
    fn ok<const N: usize>(changes: [(&str, Value); N]) -> Self {
        Self {
            success: true,
            changes: changes
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            changes: BTreeMap::new(),
            error: Some(error.into()),
        }
    }

    /// Look up a change by key.
    pub fn change(&self, key: &str) -> Option<&Value> {
        self.changes.get(key)
    }
}

/// A change an event makes to the game world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Effect {
    /// Pays every citizen a wage
    Payday { wage_multiplier: f64, base_wage: i64 },
    /// Cuts market prices by a fraction in `[0, 1]`
    MarketCrash { price_reduction: f64 },
    /// Multiplies market prices for a number of days
    MarketBoost {
        price_multiplier: f64,
        duration_days: u32,
    },
    Reputation { amount: i64 },
    UnlockFeature { feature: String },
    ItemSpawn { items: Vec<ItemStack> },
    QuestStart {
        quest_id: String,
        quest_name: String,
        objectives: Vec<String>,
        time_limit_days: u32,
        reward_gold: i64,
    },
    Weather { weather: Weather, duration_days: u32 },
    /// Applies a tax at a rate in `[0, 1]`
    Tax { rate: f64 },
    /// Introduces a competitor with strength in `[0, 1]`
    Competitor {
        competitor_id: String,
        competitor_name: String,
        strength: f64,
    },
}

fn is_fraction(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl Effect {
    /// Short name of the effect kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Payday { .. } => "payday",
            Effect::MarketCrash { .. } => "market_crash",
            Effect::MarketBoost { .. } => "market_boost",
            Effect::Reputation { .. } => "reputation",
            Effect::UnlockFeature { .. } => "unlock_feature",
            Effect::ItemSpawn { .. } => "item_spawn",
            Effect::QuestStart { .. } => "quest_start",
            Effect::Weather { .. } => "weather",
            Effect::Tax { .. } => "tax",
            Effect::Competitor { .. } => "competitor",
        }
    }

    /// Describe the changes this effect makes.
    ///
    /// The context is accepted so effects can scale with game state; none of
    /// the current variants read it.
    pub fn apply(&self, _ctx: &EventContext) -> EffectResult {
        match self {
            Effect::Payday {
                wage_multiplier,
                base_wage,
            } => {
                let wage = (*base_wage as f64 * wage_multiplier) as i64;
                let distributed =
                    (*base_wage as f64 * wage_multiplier * PAYDAY_CITIZENS as f64) as i64;
                EffectResult::ok([
                    ("gold_distributed", json!(distributed)),
                    ("citizens_paid", json!(PAYDAY_CITIZENS)),
                    ("wage_per_citizen", json!(wage)),
                ])
            }
            Effect::MarketCrash { price_reduction } => {
                if !is_fraction(*price_reduction) {
                    return EffectResult::failed(format!(
                        "Price reduction must be between 0 and 1, got {}",
                        price_reduction
                    ));
                }
                EffectResult::ok([
                    ("prices_reduced", json!(true)),
                    ("reduction_percent", json!(price_reduction * 100.0)),
                ])
            }
            Effect::MarketBoost {
                price_multiplier,
                duration_days,
            } => {
                if !price_multiplier.is_finite() || *price_multiplier < 0.0 {
                    return EffectResult::failed(format!(
                        "Price multiplier must be non-negative, got {}",
                        price_multiplier
                    ));
                }
                EffectResult::ok([
                    ("prices_boosted", json!(true)),
                    ("boost_percent", json!((price_multiplier - 1.0) * 100.0)),
                    ("duration_days", json!(duration_days)),
                ])
            }
            Effect::Reputation { amount } => {
                EffectResult::ok([("reputation_change", json!(amount))])
            }
            Effect::UnlockFeature { feature } => {
                EffectResult::ok([("feature_unlocked", json!(feature))])
            }
            Effect::ItemSpawn { items } => {
                let spawned: BTreeMap<&str, u32> = items
                    .iter()
                    .map(|stack| (stack.item_id.as_str(), stack.quantity))
                    .collect();
                EffectResult::ok([("items_spawned", json!(spawned))])
            }
            Effect::QuestStart {
                quest_id,
                quest_name,
                objectives,
                time_limit_days,
                reward_gold,
            } => EffectResult::ok([
                ("quest_started", json!(quest_id)),
                ("quest_name", json!(quest_name)),
                ("objectives", json!(objectives)),
                ("time_limit", json!(time_limit_days)),
                ("reward_gold", json!(reward_gold)),
            ]),
            Effect::Weather {
                weather,
                duration_days,
            } => EffectResult::ok([
                ("weather_changed", json!(weather.as_str())),
                ("duration_days", json!(duration_days)),
            ]),
            Effect::Tax { rate } => {
                if !is_fraction(*rate) {
                    return EffectResult::failed(format!(
                        "Tax rate must be between 0 and 1, got {}",
                        rate
                    ));
                }
                EffectResult::ok([
                    ("tax_applied", json!(true)),
                    ("tax_rate", json!(rate * 100.0)),
                ])
            }
            Effect::Competitor {
                competitor_id,
                competitor_name,
                strength,
            } => {
                if !is_fraction(*strength) {
                    return EffectResult::failed(format!(
                        "Competitor strength must be between 0 and 1, got {}",
                        strength
                    ));
                }
                EffectResult::ok([
                    ("competitor_added", json!(competitor_id)),
                    ("competitor_name", json!(competitor_name)),
                    ("strength", json!(strength)),
                ])
            }
        }
    }
}
