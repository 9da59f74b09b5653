//! Engine composition.
//!
//! `EventEngine` owns one registry and one frequency engine and runs both
//! triggering paths once per simulated day.

use std::sync::Arc;

use serde::Serialize;
use tails_domain::{CalendarTime, EventContext, EventTriggerResult};

use crate::frequency::{FrequencyEngine, GamePhase};
use crate::infrastructure::{
    clock::{SeededRandom, SystemClock, SystemRandom},
    ports::{ClockPort, RandomPort},
    settings::EngineSettings,
};
use crate::registry::EventRegistry;

/// Everything that fired during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// Calendar events, in dispatch order
    pub scheduled: Vec<EventTriggerResult>,
    /// Random-pool events that passed their frequency roll
    pub pooled: Vec<EventTriggerResult>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.pooled.is_empty()
    }

    /// Ids of every event that fired this tick, follow-ups included.
    pub fn fired_ids(&self) -> Vec<String> {
        self.scheduled
            .iter()
            .chain(&self.pooled)
            .flat_map(EventTriggerResult::triggered_ids)
            .collect()
    }
}

/// Main engine state.
pub struct EventEngine {
    pub registry: Arc<EventRegistry>,
    pub frequency: Arc<FrequencyEngine>,
    random_pool_enabled: bool,
}

impl EventEngine {
    pub fn new(
        settings: EngineSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            registry: Arc::new(EventRegistry::new()),
            frequency: Arc::new(FrequencyEngine::new(settings.frequency, clock, random)),
            random_pool_enabled: settings.random_pool_enabled,
        }
    }

    /// Build an engine on the system clock, seeding the random source when
    /// the settings carry a seed.
    pub fn from_settings(settings: EngineSettings) -> Self {
        let random: Arc<dyn RandomPort> = match settings.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded random source");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(SystemRandom::new()),
        };
        Self::new(settings, Arc::new(SystemClock::new()), random)
    }

    pub fn random_pool_enabled(&self) -> bool {
        self.random_pool_enabled
    }

    /// Forward player progression to the frequency engine.
    pub fn update_game_state(&self, phase: GamePhase, player_level: u32, now: CalendarTime) {
        self.frequency.update_game_state(phase, player_level, now);
    }

    /// Run one simulated day.
    ///
    /// Scheduled events fire first. Then, if the random pool is enabled, each
    /// active pooled event whose conditions pass is rolled in registration
    /// order. A proposed cluster caps how many pooled events may fire;
    /// otherwise at most one does.
    pub fn tick(&self, ctx: &EventContext, now: CalendarTime) -> TickReport {
        self.frequency.advance_to(now);

        let scheduled = self.registry.update(ctx, now);
        let pooled = if self.random_pool_enabled {
            self.roll_pool(ctx)
        } else {
            Vec::new()
        };

        let report = TickReport { scheduled, pooled };
        if !report.is_empty() {
            tracing::info!(
                date = %now,
                scheduled = report.scheduled.len(),
                pooled = report.pooled.len(),
                "Tick fired events"
            );
        }
        report
    }

    fn roll_pool(&self, ctx: &EventContext) -> Vec<EventTriggerResult> {
        let candidates: Vec<_> = self
            .registry
            .all_events()
            .into_iter()
            .filter(|event| event.is_active() && event.is_pooled())
            .filter(|event| event.check_conditions(ctx))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let budget = match self.frequency.should_cluster_events() {
            Some(size) => {
                tracing::debug!(size, "Event cluster proposed");
                size
            }
            None => 1,
        };

        let mut fired = Vec::new();
        for event in candidates {
            if fired.len() >= budget {
                break;
            }
            if self
                .frequency
                .should_trigger_event(event.id(), event.rarity())
            {
                fired.push(self.registry.fire(event, ctx, 0));
            }
        }
        fired
    }
}
