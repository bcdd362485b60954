//! Discrete weekly time grid.
//!
//! Turns a school's operating hours into the candidate lesson start
//! minutes for each teaching day, at a fixed 30 minute granularity.
//! The sequence is ascending so that first-fit search is reproducible.

use chrono::{NaiveTime, Timelike};
use std::ops::RangeInclusive;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{format_minutes, School, FRIDAY, MONDAY};
use crate::options::GenerateOptions;

/// Step between candidate start minutes.
pub const SLOT_GRANULARITY_MINUTES: u32 = 30;

/// Teaching weekdays in search order.
pub const SCHOOL_DAYS: RangeInclusive<u8> = MONDAY..=FRIDAY;

/// Parses `HH:MM` into minutes from midnight.
pub fn parse_hhmm(value: &str) -> SchedulerResult<u32> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SchedulerError::invalid_time(value))?;
    Ok(time.hour() * 60 + time.minute())
}

/// Daily operating hours `[start_minute, end_minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    /// Opening time (minutes from midnight).
    pub start_minute: u32,
    /// Closing time (minutes from midnight).
    pub end_minute: u32,
}

impl OperatingHours {
    /// Creates operating hours, rejecting `end <= start`.
    pub fn new(start_minute: u32, end_minute: u32) -> SchedulerResult<Self> {
        if end_minute <= start_minute {
            return Err(SchedulerError::InvalidOperatingHours {
                start: format_minutes(start_minute),
                end: format_minutes(end_minute),
            });
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    /// Parses `HH:MM` opening and closing times.
    pub fn parse(start: &str, end: &str) -> SchedulerResult<Self> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// Resolves the hours for a run.
    ///
    /// Each per-run override replaces the corresponding stored value.
    /// Fails if either bound is missing after applying overrides.
    pub fn resolve(school: &School, options: &GenerateOptions) -> SchedulerResult<Self> {
        let start = options
            .preferred_start_time
            .as_deref()
            .or(school.start_time.as_deref());
        let end = options
            .preferred_end_time
            .as_deref()
            .or(school.end_time.as_deref());

        match (start, end) {
            (Some(start), Some(end)) => Self::parse(start, end),
            _ => Err(SchedulerError::OperatingHoursMissing {
                school_id: school.id.clone(),
            }),
        }
    }
}

/// Candidate lesson start times for a school day.
///
/// # Example
///
/// ```
/// use timetable_engine::scheduler::{OperatingHours, TimeGrid};
///
/// let grid = TimeGrid::new(OperatingHours::parse("08:00", "10:00").unwrap());
/// assert_eq!(grid.candidate_starts(60), vec![480, 510, 540]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    hours: OperatingHours,
    granularity: u32,
}

impl TimeGrid {
    /// Creates a grid with the standard 30 minute granularity.
    pub fn new(hours: OperatingHours) -> Self {
        Self {
            hours,
            granularity: SLOT_GRANULARITY_MINUTES,
        }
    }

    /// The operating hours this grid covers.
    pub fn hours(&self) -> OperatingHours {
        self.hours
    }

    /// Ascending start minutes `s` with `s + duration <= close`.
    ///
    /// Empty when the lesson is longer than the school day or zero length.
    pub fn candidate_starts(&self, duration_minutes: u32) -> Vec<u32> {
        if duration_minutes == 0 {
            return Vec::new();
        }
        let last_start = match self.hours.end_minute.checked_sub(duration_minutes) {
            Some(s) if s >= self.hours.start_minute => s,
            _ => return Vec::new(),
        };
        (self.hours.start_minute..=last_start)
            .step_by(self.granularity as usize)
            .collect()
    }

    /// Number of candidate slots per day for a lesson length.
    pub fn slots_per_day(&self, duration_minutes: u32) -> usize {
        self.candidate_starts(duration_minutes).len()
    }
}
