//! Read-only snapshot of game facts that conditions and effects consult.
//!
//! The caller fills in only the facts relevant to the events it evaluates.
//! Lookups are typed: a fact stored under the right key but with the wrong
//! value shape reads as absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::calendar::Season;
use crate::error::DomainError;

/// Merchant guild rank, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MerchantRank {
    Apprentice,
    Journeyman,
    Expert,
    Master,
}

impl MerchantRank {
    pub fn display_name(&self) -> &'static str {
        match self {
            MerchantRank::Apprentice => "Apprentice",
            MerchantRank::Journeyman => "Journeyman",
            MerchantRank::Expert => "Expert",
            MerchantRank::Master => "Master",
        }
    }
}

impl fmt::Display for MerchantRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for MerchantRank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Apprentice" => Ok(MerchantRank::Apprentice),
            "Journeyman" => Ok(MerchantRank::Journeyman),
            "Expert" => Ok(MerchantRank::Expert),
            "Master" => Ok(MerchantRank::Master),
            other => Err(DomainError::validation(format!("Unknown rank: {}", other))),
        }
    }
}

/// Named facts a context can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextKey {
    PlayerRank,
    PlayerGold,
    PlayerReputation,
    CurrentSeason,
    CompletedQuests,
    PlayerInventory,
    RandomValue,
    DaysPassed,
    ShopLevel,
}

/// Value stored for a context fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum ContextValue {
    Rank(MerchantRank),
    Integer(i64),
    Float(f64),
    Season(Season),
    List(Vec<String>),
    Counts(HashMap<String, u32>),
}

/// Flat snapshot of game-state facts, keyed by `ContextKey`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    facts: HashMap<ContextKey, ContextValue>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw fact, replacing any previous value for the key.
    pub fn insert(&mut self, key: ContextKey, value: ContextValue) {
        self.facts.insert(key, value);
    }

    pub fn get(&self, key: ContextKey) -> Option<&ContextValue> {
        self.facts.get(&key)
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.facts.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with(mut self, key: ContextKey, value: ContextValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_rank(self, rank: MerchantRank) -> Self {
        self.with(ContextKey::PlayerRank, ContextValue::Rank(rank))
    }

    pub fn with_gold(self, gold: i64) -> Self {
        self.with(ContextKey::PlayerGold, ContextValue::Integer(gold))
    }

    pub fn with_reputation(self, reputation: f64) -> Self {
        self.with(ContextKey::PlayerReputation, ContextValue::Float(reputation))
    }

    pub fn with_season(self, season: Season) -> Self {
        self.with(ContextKey::CurrentSeason, ContextValue::Season(season))
    }

    pub fn with_completed_quests<I, S>(self, quests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let quests = quests.into_iter().map(Into::into).collect();
        self.with(ContextKey::CompletedQuests, ContextValue::List(quests))
    }

    pub fn with_inventory<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let counts = items.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.with(ContextKey::PlayerInventory, ContextValue::Counts(counts))
    }

    /// Supply the externally drawn sample used by probability conditions.
    pub fn with_random_value(self, draw: f64) -> Self {
        self.with(ContextKey::RandomValue, ContextValue::Float(draw))
    }

    pub fn with_days_passed(self, days: i64) -> Self {
        self.with(ContextKey::DaysPassed, ContextValue::Integer(days))
    }

    pub fn with_shop_level(self, level: i64) -> Self {
        self.with(ContextKey::ShopLevel, ContextValue::Integer(level))
    }

    // =========================================================================
    // Typed Lookups (None when absent or mistyped)
    // =========================================================================

    pub fn rank(&self) -> Option<MerchantRank> {
        match self.get(ContextKey::PlayerRank)? {
            ContextValue::Rank(rank) => Some(*rank),
            _ => None,
        }
    }

    pub fn integer(&self, key: ContextKey) -> Option<i64> {
        match self.get(key)? {
            ContextValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn float(&self, key: ContextKey) -> Option<f64> {
        match self.get(key)? {
            ContextValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn season(&self) -> Option<Season> {
        match self.get(ContextKey::CurrentSeason)? {
            ContextValue::Season(season) => Some(*season),
            _ => None,
        }
    }

    pub fn completed_quests(&self) -> Option<&[String]> {
        match self.get(ContextKey::CompletedQuests)? {
            ContextValue::List(quests) => Some(quests),
            _ => None,
        }
    }

    pub fn inventory(&self) -> Option<&HashMap<String, u32>> {
        match self.get(ContextKey::PlayerInventory)? {
            ContextValue::Counts(counts) => Some(counts),
            _ => None,
        }
    }
}
