//! Weekly time window model.
//!
//! # Time Model
//! Times are minutes from school-local midnight (no time zone). Days are
//! the teaching weekdays, Monday = 1 through Friday = 5.
//!
//! A window is the half-open interval `[start_minute, end_minute)` on one
//! day. Two windows on different days never overlap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First teaching weekday (Monday).
pub const MONDAY: u8 = 1;
/// Last teaching weekday (Friday).
pub const FRIDAY: u8 = 5;

/// A time interval `[start_minute, end_minute)` on a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// Weekday, 1 (Monday) ..= 5 (Friday).
    pub day_of_week: u8,
    /// Interval start (minutes from midnight, inclusive).
    pub start_minute: u32,
    /// Interval end (minutes from midnight, exclusive).
    pub end_minute: u32,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(day_of_week: u8, start_minute: u32, end_minute: u32) -> Self {
        Self {
            day_of_week,
            start_minute,
            end_minute,
        }
    }

    /// Creates a window of `duration_minutes` starting at `start_minute`.
    pub fn starting_at(day_of_week: u8, start_minute: u32, duration_minutes: u32) -> Self {
        Self::new(day_of_week, start_minute, start_minute + duration_minutes)
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Whether the window is well formed: a teaching weekday and `start < end`.
    pub fn is_valid(&self) -> bool {
        (MONDAY..=FRIDAY).contains(&self.day_of_week) && self.start_minute < self.end_minute
    }

    /// Whether two windows overlap.
    ///
    /// Half-open test: `!(a.end <= b.start || b.end <= a.start)` on the same day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day_of_week == other.day_of_week
            && !(self.end_minute <= other.start_minute || other.end_minute <= self.start_minute)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {}-{}",
            self.day_of_week,
            format_minutes(self.start_minute),
            format_minutes(self.end_minute)
        )
    }
}

/// Formats minutes from midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(1, 480, 540);
        assert_eq!(w.duration_minutes(), 60);
        assert!(w.is_valid());
        assert_eq!(TimeWindow::starting_at(1, 480, 60), w);
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(2, 480, 540);
        let b = TimeWindow::new(2, 510, 570);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = TimeWindow::new(2, 540, 600); // touching but not overlapping
        assert!(!a.overlaps(&c));

        let other_day = TimeWindow::new(3, 480, 540);
        assert!(!a.overlaps(&other_day));
    }

    #[test]
    fn test_invalid_windows() {
        assert!(!TimeWindow::new(0, 480, 540).is_valid());
        assert!(!TimeWindow::new(6, 480, 540).is_valid());
        assert!(!TimeWindow::new(1, 540, 540).is_valid());
        assert!(!TimeWindow::new(1, 600, 540).is_valid());
    }

    #[test]
    fn test_display() {
        let w = TimeWindow::new(4, 9 * 60, 9 * 60 + 30);
        assert_eq!(w.to_string(), "day 4 09:00-09:30");
    }
}
