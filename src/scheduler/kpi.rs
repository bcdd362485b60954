//! Run metrics.
//!
//! Summarizes a search pass for the run ledger. Callers detect
//! under-scheduling by comparing `placed_count` with `requested_count`;
//! a partial timetable is not an error.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | placed_count | Occurrences placed by the run |
//! | requested_count | Sum of `periods_per_week` over loaded requirements |
//! | unplaced_occurrences | `requested_count - placed_count` |
//! | skipped_requirements | Requirements without an eligible teacher |
//! | fallback_rooms | Placements that used a typeless room instead of the preferred type |
//! | teaching_minutes_by_staff | Minutes placed per teacher |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SearchOutcome;
use crate::models::ViolationType;

/// Metrics recorded on a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    /// Occurrences placed.
    pub placed_count: usize,
    /// Occurrences requested.
    pub requested_count: usize,
    /// Occurrences left unplaced.
    pub unplaced_occurrences: usize,
    /// Requirements skipped for lack of an eligible teacher.
    pub skipped_requirements: usize,
    /// Requirement rows rejected by input validation.
    pub rejected_requirements: usize,
    /// Constraints seeded before the search.
    pub seeded_constraints: usize,
    /// Placements in a fallback room.
    pub fallback_rooms: usize,
    /// Whether the search stopped on its time budget.
    pub budget_exhausted: bool,
    /// Placed teaching minutes per staff id.
    pub teaching_minutes_by_staff: BTreeMap<String, u32>,
}

impl RunMetrics {
    /// Computes metrics from a search outcome.
    ///
    /// # Arguments
    /// * `outcome` - The finished search pass.
    /// * `rejected_requirements` - Rows dropped before the search.
    /// * `seeded_constraints` - Constraints loaded into the tracker.
    pub fn calculate(
        outcome: &SearchOutcome,
        rejected_requirements: usize,
        seeded_constraints: usize,
    ) -> Self {
        let mut teaching_minutes_by_staff: BTreeMap<String, u32> = BTreeMap::new();
        let mut fallback_rooms = 0;

        for p in &outcome.placements {
            *teaching_minutes_by_staff
                .entry(p.staff_id.clone())
                .or_insert(0) += p.window.duration_minutes();
            if p
                .violations
                .iter()
                .any(|v| v.violation_type == ViolationType::RoomTypeFallback)
            {
                fallback_rooms += 1;
            }
        }

        Self {
            placed_count: outcome.placements.len(),
            requested_count: outcome.requested,
            unplaced_occurrences: outcome.unplaced,
            skipped_requirements: outcome.skipped_requirements,
            rejected_requirements,
            seeded_constraints,
            fallback_rooms,
            budget_exhausted: outcome.budget_exhausted,
            teaching_minutes_by_staff,
        }
    }

    /// Fraction of requested occurrences that were placed (1.0 if none requested).
    pub fn fill_rate(&self) -> f64 {
        if self.requested_count == 0 {
            return 1.0;
        }
        self.placed_count as f64 / self.requested_count as f64
    }

    /// Whether every requested occurrence was placed.
    pub fn is_complete(&self) -> bool {
        self.placed_count == self.requested_count
    }
}
