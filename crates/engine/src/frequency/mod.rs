//! Frequency and cooldown engine for the random event pool.
//!
//! Decides whether a pooled event fires on a given roll. The probability of an
//! event grows with game phase, player level and elapsed days, shrinks for
//! events that fired recently, and gets a bonus when many different events
//! have fired lately. Cooldowns and recency are measured in simulated days;
//! wall-clock time is only used to rate-limit engagement adjustments.

mod config;
mod ledger;

pub use config::{FrequencyConfig, GamePhase};
pub use ledger::{EventFrequencyData, EventFrequencyStats, EventSuggestion, INTERVAL_SMOOTHING};

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tails_domain::{CalendarTime, EventId, Rarity};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Hard ceiling on the per-roll probability of any event
pub const MAX_EVENT_PROBABILITY: f64 = 0.5;

/// Days over which the recent-event penalty decays back to 1
pub const RECENT_WINDOW_DAYS: u64 = 7;

/// Days an occurrence counts towards the variety bonus
pub const VARIETY_WINDOW_DAYS: u64 = 3;

/// Minimum wall-clock time between engagement adjustments
const ADJUSTMENT_INTERVAL_MINUTES: i64 = 60;

struct FrequencyState {
    config: FrequencyConfig,
    history: BTreeMap<EventId, EventFrequencyData>,
    phase: GamePhase,
    player_level: u32,
    day: u64,
    last_adjustment: Option<DateTime<Utc>>,
}

impl FrequencyState {
    fn new(config: FrequencyConfig) -> Self {
        Self {
            config,
            history: BTreeMap::new(),
            phase: GamePhase::Early,
            player_level: 1,
            day: 0,
            last_adjustment: None,
        }
    }

    fn is_off_cooldown(&self, id: &EventId) -> bool {
        self.history
            .get(id)
            .map_or(true, |data| data.is_eligible(self.day))
    }

    fn recent_penalty(&self, id: &EventId) -> f64 {
        let Some(data) = self.history.get(id) else {
            return 1.0;
        };
        let days_since = data.days_since(self.day);
        if days_since >= RECENT_WINDOW_DAYS {
            return 1.0;
        }
        let floor = self.config.recent_event_penalty;
        floor + (1.0 - floor) * (days_since as f64 / RECENT_WINDOW_DAYS as f64)
    }

    fn variety_bonus(&self) -> f64 {
        let recent = self
            .history
            .values()
            .filter(|data| data.days_since(self.day) < VARIETY_WINDOW_DAYS)
            .count();
        let bonus = self.config.variety_bonus;
        if recent >= 5 {
            bonus
        } else if recent >= 3 {
            1.0 + (bonus - 1.0) / 2.0
        } else {
            1.0
        }
    }

    fn probability(&self, id: &EventId, rarity: Rarity) -> f64 {
        let config = &self.config;
        let probability = config.base_probability(rarity)
            * config.phase_multiplier(self.phase)
            * (1.0 + self.player_level as f64 * config.player_level_multiplier)
            * (1.0 + self.day as f64 * config.day_progress_multiplier)
            * self.recent_penalty(id)
            * self.variety_bonus();
        probability.min(MAX_EVENT_PROBABILITY)
    }

    fn record(&mut self, id: &EventId, rarity: Rarity) {
        let day = self.day;
        let cooldown = self.config.cooldown_days(rarity);
        match self.history.get_mut(id) {
            Some(data) => data.record(rarity, day, cooldown),
            None => {
                self.history.insert(
                    id.clone(),
                    EventFrequencyData::first(id.clone(), rarity, day, cooldown),
                );
            }
        }
    }
}

/// Stochastic gate for pooled events.
///
/// Thread-safe; share it behind an `Arc`.
pub struct FrequencyEngine {
    state: RwLock<FrequencyState>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl FrequencyEngine {
    pub fn new(
        config: FrequencyConfig,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            state: RwLock::new(FrequencyState::new(config)),
            clock,
            random,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FrequencyState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FrequencyState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Update phase, level and the current simulated day.
    pub fn update_game_state(&self, phase: GamePhase, player_level: u32, now: CalendarTime) {
        let mut state = self.write();
        state.phase = phase;
        state.player_level = player_level;
        state.day = now.days_since_epoch();
    }

    /// Move the current simulated day to `now`, keeping phase and level.
    pub fn advance_to(&self, now: CalendarTime) {
        self.write().day = now.days_since_epoch();
    }

    /// Roll for `id`. Records an occurrence and starts its cooldown on success.
    pub fn should_trigger_event(&self, id: &EventId, rarity: Rarity) -> bool {
        let mut state = self.write();

        if !state.is_off_cooldown(id) {
            tracing::trace!(event_id = %id, day = state.day, "Event on cooldown");
            return false;
        }

        let probability = state.probability(id, rarity);
        let roll = self.random.gen_unit();
        let triggered = roll < probability;

        if triggered {
            state.record(id, rarity);
        }
        tracing::debug!(
            event_id = %id,
            %rarity,
            probability,
            roll,
            triggered,
            "Rolled pooled event"
        );
        triggered
    }

    /// Current probability for `id` without rolling.
    pub fn probability_for(&self, id: &EventId, rarity: Rarity) -> f64 {
        self.read().probability(id, rarity)
    }

    /// Whether `id` is off cooldown on the current day.
    pub fn is_off_cooldown(&self, id: &EventId) -> bool {
        self.read().is_off_cooldown(id)
    }

    /// Nudge Common and Uncommon base frequencies by player engagement (0..=1).
    ///
    /// Applies at most once per wall-clock hour. Returns whether it applied.
    pub fn adjust_frequency(&self, engagement: f64) -> bool {
        let now = self.clock.now();
        let mut state = self.write();

        if let Some(last) = state.last_adjustment {
            if now - last < Duration::minutes(ADJUSTMENT_INTERVAL_MINUTES) {
                return false;
            }
        }

        let factor = if engagement < 0.3 {
            0.9
        } else if engagement > 0.7 {
            1.1
        } else {
            1.0
        };
        let config = &mut state.config;
        config.base_common = (config.base_common * factor).clamp(1.0, 5.0);
        config.base_uncommon = (config.base_uncommon * factor).clamp(0.5, 2.5);
        tracing::info!(
            engagement,
            base_common = config.base_common,
            base_uncommon = config.base_uncommon,
            "Adjusted event frequency"
        );

        state.last_adjustment = Some(now);
        true
    }

    /// Propose a burst of `1..=max_cluster_size` events, or `None`.
    pub fn should_cluster_events(&self) -> Option<usize> {
        let (enabled, probability, max_size) = {
            let state = self.read();
            (
                state.config.clustering_enabled,
                state.config.cluster_probability,
                state.config.max_cluster_size,
            )
        };
        if !enabled || max_size == 0 {
            return None;
        }
        if self.random.gen_unit() >= probability {
            return None;
        }
        let max = i32::try_from(max_size).unwrap_or(i32::MAX);
        let size = self.random.gen_range(1, max).clamp(1, max);
        Some(size as usize)
    }

    /// Up to `count` ledger events off cooldown, heaviest first.
    pub fn next_events(&self, count: usize) -> Vec<EventSuggestion> {
        let state = self.read();
        let mut suggestions: Vec<EventSuggestion> = state
            .history
            .values()
            .filter(|data| data.is_eligible(state.day))
            .map(|data| EventSuggestion {
                event_id: data.event_id.clone(),
                weight: data.weight(state.day),
                probability: state.probability(&data.event_id, data.rarity),
                rarity: data.rarity,
            })
            .collect();

        suggestions.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        suggestions.truncate(count);
        suggestions
    }

    pub fn event_stats(&self) -> EventFrequencyStats {
        EventFrequencyStats::collect(self.read().history.values())
    }

    pub fn history(&self, id: &EventId) -> Option<EventFrequencyData> {
        self.read().history.get(id).cloned()
    }

    /// Clear the ledger for a new game: day 0, level 1, early phase.
    pub fn reset_event_history(&self) {
        let mut state = self.write();
        state.history.clear();
        state.day = 0;
        state.player_level = 1;
        state.phase = GamePhase::Early;
        tracing::info!("Reset event frequency history");
    }

    pub fn set_config(&self, config: FrequencyConfig) {
        self.write().config = config;
    }

    pub fn config(&self) -> FrequencyConfig {
        self.read().config.clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.read().phase
    }

    pub fn player_level(&self) -> u32 {
        self.read().player_level
    }

    /// Current simulated day, counted from the start of the game.
    pub fn day_count(&self) -> u64 {
        self.read().day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{MockClockPort, MockRandomPort};
    use tails_domain::Season;

    fn id(s: &str) -> EventId {
        EventId::new(s).unwrap()
    }

    fn day(n: u32) -> CalendarTime {
        CalendarTime::start().add_days(n)
    }

    fn engine_with_draw(draw: f64) -> FrequencyEngine {
        FrequencyEngine::new(
            FrequencyConfig::default(),
            Arc::new(FixedClock(Utc::now())),
            Arc::new(FixedRandom(draw)),
        )
    }

    mod cooldown {
        use super::*;

        #[test]
        fn rare_event_waits_three_days() {
            let engine = engine_with_draw(0.0);
            let bandits = id("bandits");
            engine.update_game_state(GamePhase::Mid, 1, day(10));

            assert!(engine.should_trigger_event(&bandits, Rarity::Rare));
            // a draw of 0.0 would pass any probability
            engine.update_game_state(GamePhase::Mid, 1, day(12));
            assert!(!engine.should_trigger_event(&bandits, Rarity::Rare));

            engine.update_game_state(GamePhase::Mid, 1, day(13));
            assert!(engine.should_trigger_event(&bandits, Rarity::Rare));

            let history = engine.history(&bandits).unwrap();
            assert_eq!(history.occurrence_count, 2);
            assert_eq!(history.next_eligible, 16);
        }

        #[test]
        fn common_events_may_repeat_same_day() {
            let engine = engine_with_draw(0.0);
            let rumor = id("rumor");
            assert!(engine.should_trigger_event(&rumor, Rarity::Common));
            assert!(engine.should_trigger_event(&rumor, Rarity::Common));
        }

        #[test]
        fn failed_roll_records_nothing() {
            let engine = engine_with_draw(0.99);
            assert!(!engine.should_trigger_event(&id("meteor"), Rarity::Legendary));
            assert!(engine.history(&id("meteor")).is_none());
        }
    }

    mod probability {
        use super::*;

        #[test]
        fn capped_at_half() {
            let engine = engine_with_draw(0.0);
            engine.set_config(FrequencyConfig {
                base_common: 500.0,
                ..FrequencyConfig::default()
            });
            engine.update_game_state(GamePhase::End, 50, day(400));
            assert_eq!(
                engine.probability_for(&id("fair"), Rarity::Common),
                MAX_EVENT_PROBABILITY
            );
        }

        #[test]
        fn scales_with_phase_level_and_day() {
            let engine = engine_with_draw(0.0);
            engine.update_game_state(GamePhase::Mid, 0, day(0));
            let base = engine.probability_for(&id("fair"), Rarity::Common);
            assert!((base - 0.03).abs() < 1e-12);

            engine.update_game_state(GamePhase::Late, 2, day(10));
            let later = engine.probability_for(&id("fair"), Rarity::Common);
            // 0.03 * 1.2 * 1.1 * 1.2
            assert!((later - 0.03 * 1.2 * 1.1 * 1.2).abs() < 1e-12);
        }

        #[test]
        fn recent_events_are_penalised() {
            let engine = engine_with_draw(0.0);
            let rumor = id("rumor");
            engine.update_game_state(GamePhase::Mid, 0, day(0));
            let fresh = engine.probability_for(&rumor, Rarity::Common);

            assert!(engine.should_trigger_event(&rumor, Rarity::Common));
            let just_fired = engine.probability_for(&rumor, Rarity::Common);
            assert!((just_fired - fresh * 0.3).abs() < 1e-12);

            engine.update_game_state(GamePhase::Mid, 0, day(7));
            let recovered = engine.probability_for(&rumor, Rarity::Common);
            assert!((recovered - 0.03 * 1.14).abs() < 1e-12);
        }

        #[test]
        fn variety_bonus_rewards_many_distinct_events() {
            let engine = engine_with_draw(0.0);
            engine.update_game_state(GamePhase::Mid, 0, day(20));
            for name in ["a", "b", "c"] {
                assert!(engine.should_trigger_event(&id(name), Rarity::Common));
            }
            let half_bonus = engine.probability_for(&id("z"), Rarity::Common);
            assert!((half_bonus - 0.03 * 1.4 * 1.1).abs() < 1e-12);

            for name in ["d", "e"] {
                assert!(engine.should_trigger_event(&id(name), Rarity::Common));
            }
            let full_bonus = engine.probability_for(&id("z"), Rarity::Common);
            assert!((full_bonus - 0.03 * 1.4 * 1.2).abs() < 1e-12);
        }

        #[test]
        fn draw_must_be_strictly_below_probability() {
            let mut random = MockRandomPort::new();
            random.expect_gen_unit().return_const(0.03);
            let engine = FrequencyEngine::new(
                FrequencyConfig::default(),
                Arc::new(FixedClock(Utc::now())),
                Arc::new(random),
            );
            engine.update_game_state(GamePhase::Mid, 0, day(0));
            assert!(!engine.should_trigger_event(&id("fair"), Rarity::Common));
        }
    }

    mod engagement {
        use super::*;

        fn at_minutes(minutes: i64) -> DateTime<Utc> {
            DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::minutes(minutes)
        }

        #[test]
        fn adjusts_at_most_once_per_hour() {
            let mut clock = MockClockPort::new();
            let mut seq = mockall::Sequence::new();
            for minutes in [0, 30, 61] {
                clock
                    .expect_now()
                    .times(1)
                    .in_sequence(&mut seq)
                    .return_const(at_minutes(minutes));
            }
            let engine = FrequencyEngine::new(
                FrequencyConfig::default(),
                Arc::new(clock),
                Arc::new(FixedRandom(0.5)),
            );

            assert!(engine.adjust_frequency(0.9));
            assert!(!engine.adjust_frequency(0.9));
            assert!(engine.adjust_frequency(0.9));

            let config = engine.config();
            assert!((config.base_common - 3.0 * 1.1 * 1.1).abs() < 1e-9);
            assert!((config.base_uncommon - 1.5 * 1.1 * 1.1).abs() < 1e-9);
        }

        #[test]
        fn clamps_to_bounds() {
            let engine = engine_with_draw(0.5);
            engine.set_config(FrequencyConfig {
                base_common: 1.05,
                base_uncommon: 2.4,
                ..FrequencyConfig::default()
            });
            assert!(engine.adjust_frequency(0.1));
            let config = engine.config();
            assert_eq!(config.base_common, 1.0);
            assert!((config.base_uncommon - 2.16).abs() < 1e-9);
            assert_eq!(config.base_rare, 0.5);
        }

        #[test]
        fn neutral_engagement_leaves_frequencies() {
            let engine = engine_with_draw(0.5);
            assert!(engine.adjust_frequency(0.5));
            assert_eq!(engine.config().base_common, 3.0);
        }
    }

    mod clustering {
        use super::*;

        #[test]
        fn proposes_burst_when_draw_passes() {
            let mut random = MockRandomPort::new();
            random.expect_gen_unit().return_const(0.1);
            random
                .expect_gen_range()
                .withf(|min, max| *min == 1 && *max == 3)
                .return_const(2);
            let engine = FrequencyEngine::new(
                FrequencyConfig::default(),
                Arc::new(FixedClock(Utc::now())),
                Arc::new(random),
            );
            assert_eq!(engine.should_cluster_events(), Some(2));
        }

        #[test]
        fn no_burst_when_draw_fails_or_disabled() {
            assert_eq!(engine_with_draw(0.15).should_cluster_events(), None);

            let engine = engine_with_draw(0.0);
            engine.set_config(FrequencyConfig {
                clustering_enabled: false,
                ..FrequencyConfig::default()
            });
            assert_eq!(engine.should_cluster_events(), None);
        }
    }

    mod ledger {
        use super::*;

        #[test]
        fn next_events_ranks_eligible_history() {
            let engine = engine_with_draw(0.0);
            engine.update_game_state(GamePhase::Mid, 1, day(0));
            assert!(engine.should_trigger_event(&id("rumor"), Rarity::Common));
            assert!(engine.should_trigger_event(&id("caravan"), Rarity::Uncommon));
            assert!(engine.should_trigger_event(&id("dragon"), Rarity::Legendary));

            engine.update_game_state(GamePhase::Mid, 1, day(7));
            let suggestions = engine.next_events(5);
            let ids: Vec<&str> = suggestions.iter().map(|s| s.event_id.as_str()).collect();
            // dragon is still cooling down
            assert_eq!(ids, vec!["rumor", "caravan"]);
            assert!(suggestions[0].weight > suggestions[1].weight);
            assert!(suggestions.iter().all(|s| s.probability > 0.0));

            assert_eq!(engine.next_events(1).len(), 1);
        }

        #[test]
        fn stats_and_reset() {
            let engine = engine_with_draw(0.0);
            let summer = CalendarTime::new(1, Season::Summer, 1).unwrap();
            engine.update_game_state(GamePhase::Late, 4, summer);
            assert!(engine.should_trigger_event(&id("rumor"), Rarity::Common));
            assert!(engine.should_trigger_event(&id("rumor"), Rarity::Common));
            assert!(engine.should_trigger_event(&id("bandits"), Rarity::Rare));

            let stats = engine.event_stats();
            assert_eq!(stats.total_events, 2);
            assert_eq!(stats.total_occurrences, 3);
            assert_eq!(engine.day_count(), 30);

            engine.reset_event_history();
            assert_eq!(engine.event_stats(), EventFrequencyStats::default());
            assert_eq!(engine.day_count(), 0);
            assert_eq!(engine.player_level(), 1);
            assert_eq!(engine.phase(), GamePhase::Early);
        }
    }
}
