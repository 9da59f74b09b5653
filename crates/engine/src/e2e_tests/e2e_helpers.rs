//! Shared setup for scenario tests.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use tails_domain::{CalendarTime, EventContext, MerchantRank, Season};

use crate::app::{EventEngine, TickReport};
use crate::catalog;
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::settings::EngineSettings;

/// An engine loaded with the built-in catalog plus a subscriber log.
pub struct E2ETestContext {
    pub engine: EventEngine,
    pub fired: Arc<Mutex<Vec<String>>>,
}

impl E2ETestContext {
    /// Catalog engine with the random pool switched off.
    pub fn calendar_only() -> Self {
        let settings = EngineSettings {
            random_pool_enabled: false,
            ..EngineSettings::default()
        };
        Self::with_random(settings, Arc::new(FixedRandom(0.99)))
    }

    pub fn with_random(settings: EngineSettings, random: Arc<dyn RandomPort>) -> Self {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
        let engine = EventEngine::new(settings, Arc::new(clock), random);
        catalog::register_defaults(&engine.registry).unwrap();

        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        engine
            .registry
            .subscribe(move |event| sink.lock().unwrap().push(event.id().to_string()));

        Self { engine, fired }
    }

    /// Tick every day in `start..start + days`.
    pub fn run_days(&self, ctx: &EventContext, start: CalendarTime, days: u32) -> Vec<TickReport> {
        (0..days)
            .map(|offset| self.engine.tick(ctx, start.add_days(offset)))
            .collect()
    }

    pub fn fired(&self) -> Vec<String> {
        self.fired.lock().unwrap().clone()
    }
}

/// A mid-game merchant that passes most catalog conditions.
pub fn established_merchant() -> EventContext {
    EventContext::new()
        .with_rank(MerchantRank::Expert)
        .with_gold(1_000)
        .with_reputation(60.0)
        .with_days_passed(30)
        .with_shop_level(3)
}

pub fn date(season: Season, day: u8) -> CalendarTime {
    CalendarTime::new(1, season, day).unwrap()
}
