//! Merchant Tails event engine - demo runner.
//!
//! Loads the built-in catalog and simulates one season of daily ticks.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tails_domain::{CalendarTime, EventContext, MerchantRank, Season, DAYS_PER_SEASON};
use tails_engine::{catalog, EngineSettings, EventEngine, GamePhase};

fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tails_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Merchant Tails event engine");

    let settings = EngineSettings::from_env()?;
    let engine = EventEngine::from_settings(settings);
    catalog::register_defaults(&engine.registry)?;
    tracing::info!(events = engine.registry.len(), "Catalog loaded");

    engine.registry.subscribe(|event| {
        tracing::info!(event_id = %event.id(), name = event.name(), "Event fired");
    });

    let ctx = EventContext::new()
        .with_rank(MerchantRank::Journeyman)
        .with_gold(750)
        .with_reputation(20.0)
        .with_season(Season::Autumn)
        .with_days_passed(60)
        .with_shop_level(2);

    let start = CalendarTime::new(1, Season::Autumn, 1)?;
    engine.update_game_state(GamePhase::Mid, 5, start);

    let mut fired = 0;
    for offset in 0..u32::from(DAYS_PER_SEASON) {
        let today = start.add_days(offset);
        for note in engine.registry.notifications(today) {
            tracing::info!(date = %today, days_until = note.days_until, "{}", note.message);
        }
        let report = engine.tick(&ctx, today);
        for result in report.scheduled.iter().chain(&report.pooled) {
            if !result.success {
                tracing::warn!(event_id = %result.event_id, error = ?result.error, "Event failed");
            }
        }
        fired += report.fired_ids().len();
    }

    let stats = engine.frequency.event_stats();
    tracing::info!(
        fired,
        pooled_events = stats.total_events,
        pooled_occurrences = stats.total_occurrences,
        "Season complete"
    );
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
