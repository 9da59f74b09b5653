//! Tuning knobs for the frequency engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use tails_domain::Rarity;

/// Coarse stage of a playthrough, used to scale event frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Early,
    Mid,
    Late,
    End,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Early => "early",
            GamePhase::Mid => "mid",
            GamePhase::Late => "late",
            GamePhase::End => "end",
        };
        f.write_str(name)
    }
}

/// Frequency configuration.
///
/// Base frequencies are expected occurrences per 100 simulated days and are
/// divided by 100 to obtain a per-roll probability. Cooldowns are in
/// simulated days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrequencyConfig {
    pub base_common: f64,
    pub base_uncommon: f64,
    pub base_rare: f64,
    pub base_epic: f64,
    pub base_legendary: f64,

    /// Added per player level
    pub player_level_multiplier: f64,
    /// Added per elapsed simulated day
    pub day_progress_multiplier: f64,
    /// Probability floor right after an event fired
    pub recent_event_penalty: f64,
    pub variety_bonus: f64,

    pub cooldown_common: u32,
    pub cooldown_uncommon: u32,
    pub cooldown_rare: u32,
    pub cooldown_epic: u32,
    pub cooldown_legendary: u32,

    pub phase_multipliers: HashMap<GamePhase, f64>,

    pub clustering_enabled: bool,
    pub cluster_probability: f64,
    pub max_cluster_size: u32,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            base_common: 3.0,
            base_uncommon: 1.5,
            base_rare: 0.5,
            base_epic: 0.2,
            base_legendary: 0.05,

            player_level_multiplier: 0.05,
            day_progress_multiplier: 0.02,
            recent_event_penalty: 0.3,
            variety_bonus: 1.2,

            cooldown_common: 0,
            cooldown_uncommon: 1,
            cooldown_rare: 3,
            cooldown_epic: 7,
            cooldown_legendary: 14,

            phase_multipliers: HashMap::from([
                (GamePhase::Early, 0.8),
                (GamePhase::Mid, 1.0),
                (GamePhase::Late, 1.2),
                (GamePhase::End, 1.5),
            ]),

            clustering_enabled: true,
            cluster_probability: 0.15,
            max_cluster_size: 3,
        }
    }
}

impl FrequencyConfig {
    /// Per-roll probability before modifiers.
    pub fn base_probability(&self, rarity: Rarity) -> f64 {
        let per_hundred_days = match rarity {
            Rarity::Common => self.base_common,
            Rarity::Uncommon => self.base_uncommon,
            Rarity::Rare => self.base_rare,
            Rarity::Epic => self.base_epic,
            Rarity::Legendary => self.base_legendary,
        };
        per_hundred_days / 100.0
    }

    pub fn cooldown_days(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.cooldown_common,
            Rarity::Uncommon => self.cooldown_uncommon,
            Rarity::Rare => self.cooldown_rare,
            Rarity::Epic => self.cooldown_epic,
            Rarity::Legendary => self.cooldown_legendary,
        }
    }

    /// Multiplier for `phase`; a phase missing from the table is neutral.
    pub fn phase_multiplier(&self, phase: GamePhase) -> f64 {
        self.phase_multipliers.get(&phase).copied().unwrap_or(1.0)
    }
}
