//! Built-in event catalog for Merchant Tails.
//!
//! Calendar events (payday, festivals, tax day), the dragon attack chain and a
//! random pool spread across every rarity.

use tails_domain::{
    Condition, DomainError, Effect, EventCategory, EventDefinition, EventId, EventPriority,
    ItemStack, MerchantRank, Rarity, Rewards, Schedule, Season, Weather,
};

use crate::registry::EventRegistry;

fn id(raw: &str) -> Result<EventId, DomainError> {
    EventId::new(raw)
}

/// Every built-in event, calendar events first.
pub fn default_events() -> Result<Vec<EventDefinition>, DomainError> {
    let mut events = calendar_events()?;
    events.extend(dragon_chain()?);
    events.extend(random_pool()?);
    Ok(events)
}

/// Register [`default_events`] and check their follow-up graph.
pub fn register_defaults(registry: &EventRegistry) -> Result<(), DomainError> {
    registry.register_all(default_events()?)?;
    registry.validate_follow_ups()
}

// =============================================================================
// Calendar
// =============================================================================

fn calendar_events() -> Result<Vec<EventDefinition>, DomainError> {
    Ok(vec![
        EventDefinition::new(id("payday")?, "Payday", EventCategory::Regular, EventPriority::High)
            .with_description("Citizens receive their wages and head to the market.")
            .with_schedule(Schedule::Monthly { day_of_month: 1 })
            .with_effect(Effect::Payday {
                wage_multiplier: 1.0,
                base_wage: 100,
            })
            .with_notification_lead_days(2),
        EventDefinition::seasonal(id("spring_fair")?, "Spring Fair", Season::Spring, 10)
            .with_effect(Effect::MarketBoost {
                price_multiplier: 1.2,
                duration_days: 3,
            })
            .with_notification_lead_days(5),
        EventDefinition::seasonal(id("summer_heatwave")?, "Summer Heatwave", Season::Summer, 20)
            .with_effect(Effect::Weather {
                weather: Weather::Sunny,
                duration_days: 5,
            }),
        EventDefinition::seasonal(id("harvest_festival")?, "Harvest Festival", Season::Autumn, 15)
            .with_effects(vec![
                Effect::MarketBoost {
                    price_multiplier: 1.5,
                    duration_days: 3,
                },
                Effect::Reputation { amount: 5 },
            ])
            .with_rewards(Rewards {
                gold: 200,
                reputation: 5,
                items: vec!["pumpkin".to_string()],
                experience: 50,
            })
            .with_notification_lead_days(3),
        EventDefinition::seasonal(id("winter_tax")?, "Winter Tax Day", Season::Winter, 30)
            .with_description("The crown collects its seasonal due.")
            .with_effect(Effect::Tax { rate: 0.1 })
            .with_notification_lead_days(7),
        EventDefinition::new(
            id("guild_exam")?,
            "Guild Examination",
            EventCategory::Major,
            EventPriority::High,
        )
        .with_schedule(Schedule::Seasonal {
            season: Season::Summer,
            day_of_season: 1,
        })
        .with_condition(Condition::all_of(vec![
            Condition::Rank {
                min: MerchantRank::Journeyman,
            },
            Condition::Gold { min: 500 },
        ]))
        .with_effect(Effect::UnlockFeature {
            feature: "guild_contracts".to_string(),
        }),
    ])
}

// =============================================================================
// Dragon attack chain
// =============================================================================

fn dragon_chain() -> Result<Vec<EventDefinition>, DomainError> {
    Ok(vec![
        EventDefinition::new(
            id("dragon_attack")?,
            "Dragon Attack",
            EventCategory::Major,
            EventPriority::Urgent,
        )
        .with_description("A dragon descends on the market square!")
        .with_effects(vec![
            Effect::MarketCrash {
                price_reduction: 0.3,
            },
            Effect::Reputation { amount: -5 },
        ])
        .with_follow_ups(vec![id("rebuild_town")?, id("hero_celebration")?]),
        EventDefinition::new(
            id("rebuild_town")?,
            "Rebuild the Town",
            EventCategory::Major,
            EventPriority::High,
        )
        .with_effect(Effect::QuestStart {
            quest_id: "rebuild_town".to_string(),
            quest_name: "Rebuild the Town".to_string(),
            objectives: vec![
                "Deliver 20 timber".to_string(),
                "Deliver 10 stone".to_string(),
            ],
            time_limit_days: 14,
            reward_gold: 500,
        }),
        EventDefinition::new(
            id("hero_celebration")?,
            "Hero Celebration",
            EventCategory::Major,
            EventPriority::Normal,
        )
        .with_effects(vec![
            Effect::Reputation { amount: 10 },
            Effect::MarketBoost {
                price_multiplier: 1.3,
                duration_days: 2,
            },
        ]),
    ])
}

// =============================================================================
// Random pool
// =============================================================================

fn pooled(raw: &str, name: &str, rarity: Rarity) -> Result<EventDefinition, DomainError> {
    Ok(EventDefinition::new(id(raw)?, name, EventCategory::Random, EventPriority::Normal)
        .with_rarity(rarity))
}

fn random_pool() -> Result<Vec<EventDefinition>, DomainError> {
    Ok(vec![
        pooled("wandering_trader", "Wandering Trader", Rarity::Common)?.with_effect(
            Effect::ItemSpawn {
                items: vec![ItemStack::new("exotic_spice", 3)],
            },
        ),
        pooled("rainy_day", "Rainy Day", Rarity::Common)?.with_effect(Effect::Weather {
            weather: Weather::Rainy,
            duration_days: 1,
        }),
        pooled("bandit_raid", "Bandit Raid", Rarity::Uncommon)?
            .with_condition(Condition::Time { min_days_passed: 7 })
            .with_effect(Effect::MarketCrash {
                price_reduction: 0.1,
            }),
        pooled("rival_shop", "Rival Shop Opens", Rarity::Rare)?
            .with_condition(Condition::ShopLevel { min: 2 })
            .with_effect(Effect::Competitor {
                competitor_id: "golden_scale".to_string(),
                competitor_name: "The Golden Scale".to_string(),
                strength: 0.6,
            }),
        pooled("royal_visit", "Royal Visit", Rarity::Epic)?
            .with_condition(Condition::Reputation { min: 50.0 })
            .with_effect(Effect::Reputation { amount: 15 }),
        pooled("comet_sighting", "Comet Sighting", Rarity::Legendary)?.with_effect(
            Effect::MarketBoost {
                price_multiplier: 2.0,
                duration_days: 1,
            },
        ),
        pooled("dragon_sighting", "Dragon Sighting", Rarity::Legendary)?
            .with_condition(Condition::Rank {
                min: MerchantRank::Expert,
            })
            .with_follow_up(id("dragon_attack")?),
    ])
}
