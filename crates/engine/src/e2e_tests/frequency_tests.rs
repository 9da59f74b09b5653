//! Random pool behaviour across many ticks.

use std::sync::Arc;

use super::*;
use crate::frequency::{GamePhase, MAX_EVENT_PROBABILITY};
use crate::infrastructure::clock::{FixedRandom, SeededRandom};
use crate::infrastructure::settings::EngineSettings;
use tails_domain::{EventId, Rarity, Season};

fn pool_only(random: Arc<dyn crate::infrastructure::ports::RandomPort>) -> E2ETestContext {
    let mut settings = EngineSettings::default();
    settings.frequency.clustering_enabled = false;
    let ctx = E2ETestContext::with_random(settings, random);
    for event in ctx.engine.registry.all_events() {
        if !event.is_pooled() {
            ctx.engine.registry.set_active(event.id().as_str(), false).unwrap();
        }
    }
    ctx
}

#[test]
fn certain_rolls_respect_cooldowns() {
    let ctx = pool_only(Arc::new(FixedRandom(0.0)));
    ctx.engine.registry.set_active("wandering_trader", false).unwrap();
    ctx.engine.registry.set_active("rainy_day", false).unwrap();
    ctx.engine.registry.set_active("bandit_raid", false).unwrap();
    ctx.engine.registry.set_active("royal_visit", false).unwrap();
    ctx.engine.registry.set_active("comet_sighting", false).unwrap();
    ctx.engine.registry.set_active("dragon_sighting", false).unwrap();

    // rival_shop is Rare: three-day cooldown
    let reports = ctx.run_days(&established_merchant(), date(Season::Spring, 1), 7);
    let fired_days: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.pooled.is_empty())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fired_days, vec![0, 3, 6]);
}

#[test]
fn one_pooled_event_per_tick_without_clusters() {
    let ctx = pool_only(Arc::new(FixedRandom(0.0)));
    let reports = ctx.run_days(&established_merchant(), date(Season::Spring, 1), 20);
    assert!(reports.iter().all(|r| r.pooled.len() <= 1));
    assert!(reports.iter().any(|r| !r.pooled.is_empty()));
}

#[test]
fn probabilities_stay_capped_late_game() {
    let ctx = pool_only(Arc::new(FixedRandom(0.99)));
    let now = date(Season::Winter, 30).add_days(5 * 120);
    ctx.engine.update_game_state(GamePhase::End, 100, now);

    for rarity in Rarity::all() {
        let p = ctx
            .engine
            .frequency
            .probability_for(&EventId::new("any_event").unwrap(), rarity);
        assert!(p <= MAX_EVENT_PROBABILITY);
    }
    assert!(ctx.engine.tick(&established_merchant(), now).pooled.is_empty());
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed| {
        let ctx = pool_only(Arc::new(SeededRandom::new(seed)));
        ctx.run_days(&established_merchant(), date(Season::Spring, 1), 60);
        ctx.fired()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn stats_track_pooled_history() {
    let ctx = pool_only(Arc::new(FixedRandom(0.0)));
    ctx.run_days(&established_merchant(), date(Season::Spring, 1), 10);

    let stats = ctx.engine.frequency.event_stats();
    assert_eq!(stats.total_occurrences as usize, ctx.fired().len());
    assert!(stats.total_events > 0);

    ctx.engine.frequency.reset_event_history();
    assert_eq!(ctx.engine.frequency.event_stats().total_events, 0);
}
