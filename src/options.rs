//! Per-run generator options.
//!
//! Deserializes from the camelCase JSON shape used by the application
//! layer; every field is optional on the wire.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for one `generate_timetable` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Restrict requirement loading to these sections. `None` = all sections.
    pub target_section_ids: Option<Vec<String>>,
    /// Override of the school's opening time (`HH:MM`) for this run.
    pub preferred_start_time: Option<String>,
    /// Override of the school's closing time (`HH:MM`) for this run.
    pub preferred_end_time: Option<String>,
    /// Seed pinned slots as constraints.
    pub include_pinned: bool,
    /// Seed staff and room unavailability windows as constraints.
    pub honor_unavailability: bool,
    /// Wall-clock budget for the search (ms). `None` = unbounded.
    pub time_budget_ms: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            target_section_ids: None,
            preferred_start_time: None,
            preferred_end_time: None,
            include_pinned: true,
            honor_unavailability: true,
            time_budget_ms: None,
        }
    }
}

impl GenerateOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the run to the given sections.
    pub fn with_sections<I, S>(mut self, section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_section_ids = Some(section_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the operating hours for this run.
    pub fn with_hours(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.preferred_start_time = Some(start.into());
        self.preferred_end_time = Some(end.into());
        self
    }

    /// Sets whether pinned slots are seeded.
    pub fn with_pinned(mut self, include_pinned: bool) -> Self {
        self.include_pinned = include_pinned;
        self
    }

    /// Sets whether unavailability windows are seeded.
    pub fn with_unavailability(mut self, honor_unavailability: bool) -> Self {
        self.honor_unavailability = honor_unavailability;
        self
    }

    /// Sets the search wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The search budget as a `Duration`.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}
