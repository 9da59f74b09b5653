//! Calendar schedules for events

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarTime, Season};

/// When a scheduled event recurs on the simulated calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Schedule {
    /// Exactly once, on the given day
    OneTime { at: CalendarTime },
    /// Every season on the given day
    Monthly { day_of_month: u8 },
    /// Once a year, on the given day of the given season
    Seasonal { season: Season, day_of_season: u8 },
    /// Never fires from the calendar; the event belongs to the random pool.
    ///
    /// `probability` is authored content only. Pool rolls use the frequency
    /// engine's rarity model and never read it.
    Random { probability: f64 },
}

impl Schedule {
    /// Whether the schedule fires on `now`.
    pub fn should_trigger(&self, now: CalendarTime) -> bool {
        match self {
            Schedule::OneTime { at } => *at == now,
            Schedule::Monthly { day_of_month } => now.day() == *day_of_month,
            Schedule::Seasonal {
                season,
                day_of_season,
            } => now.season() == *season && now.day() == *day_of_season,
            Schedule::Random { .. } => false,
        }
    }

    /// Offset in days (0 = `from` itself) of the first firing within
    /// `0..=horizon_days`, walking the calendar forward day by day.
    pub fn next_occurrence(&self, from: CalendarTime, horizon_days: u32) -> Option<u32> {
        if self.is_random() {
            return None;
        }
        let mut day = from;
        for offset in 0..=horizon_days {
            if self.should_trigger(day) {
                return Some(offset);
            }
            day = day.next_day();
        }
        None
    }

    pub fn is_random(&self) -> bool {
        matches!(self, Schedule::Random { .. })
    }

    /// Season of a seasonal schedule.
    pub fn season(&self) -> Option<Season> {
        match self {
            Schedule::Seasonal { season, .. } => Some(*season),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: u32, season: Season, day: u8) -> CalendarTime {
        CalendarTime::new(year, season, day).unwrap()
    }

    mod should_trigger {
        use super::*;

        #[test]
        fn monthly_matches_day_in_any_season() {
            let schedule = Schedule::Monthly { day_of_month: 15 };
            assert!(schedule.should_trigger(at(1, Season::Spring, 15)));
            assert!(schedule.should_trigger(at(4, Season::Winter, 15)));
            assert!(!schedule.should_trigger(at(1, Season::Spring, 14)));
        }

        #[test]
        fn seasonal_requires_season_and_day() {
            let schedule = Schedule::Seasonal {
                season: Season::Autumn,
                day_of_season: 15,
            };
            assert!(schedule.should_trigger(at(1, Season::Autumn, 15)));
            assert!(schedule.should_trigger(at(9, Season::Autumn, 15)));
            assert!(!schedule.should_trigger(at(1, Season::Spring, 15)));
            assert!(!schedule.should_trigger(at(1, Season::Autumn, 14)));
        }

        #[test]
        fn one_time_requires_exact_day() {
            let schedule = Schedule::OneTime {
                at: at(2, Season::Summer, 10),
            };
            assert!(schedule.should_trigger(at(2, Season::Summer, 10)));
            assert!(!schedule.should_trigger(at(3, Season::Summer, 10)));
        }

        #[test]
        fn random_never_fires_from_calendar() {
            let schedule = Schedule::Random { probability: 1.0 };
            assert!(!schedule.should_trigger(at(1, Season::Spring, 1)));
        }
    }

    mod next_occurrence {
        use super::*;

        #[test]
        fn same_day_is_offset_zero() {
            let schedule = Schedule::Monthly { day_of_month: 1 };
            assert_eq!(
                schedule.next_occurrence(at(1, Season::Summer, 1), 10),
                Some(0)
            );
        }

        #[test]
        fn rolls_over_season_boundary() {
            let schedule = Schedule::Monthly { day_of_month: 2 };
            assert_eq!(
                schedule.next_occurrence(at(1, Season::Spring, 29), 5),
                Some(3)
            );
        }

        #[test]
        fn respects_horizon() {
            let schedule = Schedule::Seasonal {
                season: Season::Autumn,
                day_of_season: 15,
            };
            let now = at(1, Season::Autumn, 12);
            assert_eq!(schedule.next_occurrence(now, 3), Some(3));
            assert_eq!(schedule.next_occurrence(now, 2), None);
            assert_eq!(
                Schedule::Random { probability: 0.5 }.next_occurrence(now, 300),
                None
            );
        }
    }
}
