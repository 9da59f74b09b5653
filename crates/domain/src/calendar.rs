//! Simulated calendar time
//!
//! The game year has four seasons of 30 days each. `CalendarTime` is the only
//! clock the scheduling code reads; it is advanced once per simulated day by
//! the game loop and never derived from wall-clock time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Number of days in every season
pub const DAYS_PER_SEASON: u8 = 30;

/// Number of days in a game year
pub const DAYS_PER_YEAR: u32 = DAYS_PER_SEASON as u32 * 4;

/// Last representable year; day arithmetic saturates on its final day
pub const MAX_YEAR: u32 = 1_000_000;

// ============================================================================
// Season
// ============================================================================

/// The four seasons of the year, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Returns the display name for this season.
    pub fn display_name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }

    /// Zero-based position of the season within the year.
    pub fn index(&self) -> u8 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    /// Season at a zero-based position, wrapping every four.
    pub fn from_index(index: u8) -> Season {
        match index % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Season {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            other => Err(DomainError::validation(format!("Unknown season: {}", other))),
        }
    }
}

// ============================================================================
// CalendarTime
// ============================================================================

/// A day on the simulated calendar.
///
/// # Invariants
///
/// - `year >= 1`
/// - `1 <= day <= DAYS_PER_SEASON`
///
/// Ordering is chronological: year, then season, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CalendarTimeParts")]
pub struct CalendarTime {
    year: u32,
    season: Season,
    day: u8,
}

/// Unvalidated wire form of `CalendarTime`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarTimeParts {
    year: u32,
    season: Season,
    day: u8,
}

impl TryFrom<CalendarTimeParts> for CalendarTime {
    type Error = DomainError;

    fn try_from(parts: CalendarTimeParts) -> Result<Self, Self::Error> {
        CalendarTime::new(parts.year, parts.season, parts.day)
    }
}

impl CalendarTime {
    /// Create a validated calendar day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the year is outside `1..=MAX_YEAR`
    /// or the day is outside `1..=DAYS_PER_SEASON`.
    pub fn new(year: u32, season: Season, day: u8) -> Result<Self, DomainError> {
        if year == 0 || year > MAX_YEAR {
            return Err(DomainError::validation(format!(
                "Year must be between 1 and {}, got {}",
                MAX_YEAR, year
            )));
        }
        if day == 0 || day > DAYS_PER_SEASON {
            return Err(DomainError::validation(format!(
                "Day must be between 1 and {}, got {}",
                DAYS_PER_SEASON, day
            )));
        }
        Ok(Self { year, season, day })
    }

    /// The first day of a new game: Spring 1, Year 1.
    pub fn start() -> Self {
        Self {
            year: 1,
            season: Season::Spring,
            day: 1,
        }
    }

    /// Rebuild a calendar day from a count of days since the start of the game.
    ///
    /// Counts past the end of `MAX_YEAR` clamp to its last day.
    pub fn from_days_since_epoch(days: u64) -> Self {
        let days = days.min(MAX_YEAR as u64 * DAYS_PER_YEAR as u64 - 1);
        let year = (days / DAYS_PER_YEAR as u64) as u32 + 1;
        let within_year = (days % DAYS_PER_YEAR as u64) as u32;
        let season = Season::from_index((within_year / DAYS_PER_SEASON as u32) as u8);
        let day = (within_year % DAYS_PER_SEASON as u32) as u8 + 1;
        Self { year, season, day }
    }

    #[inline]
    pub fn year(&self) -> u32 {
        self.year
    }

    #[inline]
    pub fn season(&self) -> Season {
        self.season
    }

    /// Day within the current season (1-based).
    #[inline]
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Day within the current year (1..=120).
    pub fn day_of_year(&self) -> u32 {
        self.season.index() as u32 * DAYS_PER_SEASON as u32 + self.day as u32
    }

    /// Days elapsed since Spring 1, Year 1 (which is day 0).
    pub fn days_since_epoch(&self) -> u64 {
        (self.year as u64 - 1) * DAYS_PER_YEAR as u64 + (self.day_of_year() as u64 - 1)
    }

    /// Returns the day after this one, rolling over seasons and years.
    pub fn next_day(&self) -> Self {
        self.add_days(1)
    }

    /// Returns the day `days` after this one.
    pub fn add_days(&self, days: u32) -> Self {
        Self::from_days_since_epoch(self.days_since_epoch() + days as u64)
    }

    /// Signed number of days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(&self, other: CalendarTime) -> i64 {
        other.days_since_epoch() as i64 - self.days_since_epoch() as i64
    }

    pub fn display_date(&self) -> String {
        format!("{} {}, Year {}", self.season, self.day, self.year)
    }
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_date())
    }
}
