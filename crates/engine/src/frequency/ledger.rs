//! Per-event occurrence ledger and the reports built from it.

use serde::Serialize;
use std::collections::BTreeMap;

use tails_domain::{EventId, Rarity};

/// Smoothing factor for the average-interval moving average
pub const INTERVAL_SMOOTHING: f64 = 0.3;

/// Occurrence history of one pooled event, in simulated days
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrequencyData {
    pub event_id: EventId,
    pub rarity: Rarity,
    /// Day (since the start of the game) the event last fired
    pub last_occurred: u64,
    pub occurrence_count: u32,
    /// Exponential moving average of days between occurrences; 0 until the second
    pub average_interval_days: f64,
    /// First day the event may fire again
    pub next_eligible: u64,
}

impl EventFrequencyData {
    pub(crate) fn first(event_id: EventId, rarity: Rarity, day: u64, cooldown_days: u32) -> Self {
        Self {
            event_id,
            rarity,
            last_occurred: day,
            occurrence_count: 1,
            average_interval_days: 0.0,
            next_eligible: day + cooldown_days as u64,
        }
    }

    /// Record another occurrence on `day`.
    pub(crate) fn record(&mut self, rarity: Rarity, day: u64, cooldown_days: u32) {
        let interval = day.saturating_sub(self.last_occurred) as f64;
        self.average_interval_days = if self.average_interval_days == 0.0 {
            interval
        } else {
            INTERVAL_SMOOTHING * interval + (1.0 - INTERVAL_SMOOTHING) * self.average_interval_days
        };
        self.rarity = rarity;
        self.last_occurred = day;
        self.occurrence_count += 1;
        self.next_eligible = day + cooldown_days as u64;
    }

    #[inline]
    pub fn is_eligible(&self, day: u64) -> bool {
        day >= self.next_eligible
    }

    #[inline]
    pub fn days_since(&self, day: u64) -> u64 {
        day.saturating_sub(self.last_occurred)
    }

    /// Selection weight: rarer, more recent and more frequent events weigh less.
    pub fn weight(&self, day: u64) -> f64 {
        let rarity_weight = 1.0 / (self.rarity.index() as f64 + 1.0);
        let time_weight = (self.days_since(day) as f64 / 7.0).min(2.0);
        let frequency_weight = 1.0 / (self.occurrence_count.max(1) as f64);
        rarity_weight * time_weight * frequency_weight
    }
}

/// A ranked candidate from `FrequencyEngine::next_events`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSuggestion {
    pub event_id: EventId,
    pub weight: f64,
    pub probability: f64,
    pub rarity: Rarity,
}

/// Aggregate view of the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrequencyStats {
    /// Distinct events that have fired at least once
    pub total_events: usize,
    pub total_occurrences: u64,
    pub events_by_rarity: BTreeMap<Rarity, usize>,
    /// Mean of the per-event average intervals, over events that fired twice or more
    pub average_intervals: BTreeMap<Rarity, f64>,
}

impl EventFrequencyStats {
    pub(crate) fn collect<'a>(entries: impl Iterator<Item = &'a EventFrequencyData>) -> Self {
        let mut stats = Self::default();
        let mut interval_sums: BTreeMap<Rarity, (f64, usize)> = BTreeMap::new();

        for data in entries {
            stats.total_events += 1;
            stats.total_occurrences += data.occurrence_count as u64;
            *stats.events_by_rarity.entry(data.rarity).or_default() += 1;

            if data.occurrence_count > 1 {
                let (sum, n) = interval_sums.entry(data.rarity).or_default();
                *sum += data.average_interval_days;
                *n += 1;
            }
        }

        stats.average_intervals = interval_sums
            .into_iter()
            .map(|(rarity, (sum, n))| (rarity, sum / n as f64))
            .collect();
        stats
    }
}
