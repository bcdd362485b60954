//! Constraint seeding.
//!
//! Collects the immovable reservations of a school (published entries,
//! pinned slots, staff and room unavailability) and loads them into an
//! [`OccupancyTracker`] before any placement is attempted.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::OccupancyTracker;
use crate::error::SchedulerResult;
use crate::models::{ConstraintSource, SeededConstraint};
use crate::options::GenerateOptions;
use crate::store::TimetableStore;
use crate::validation::validate_windows;

/// The seeded constraints of one run.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    constraints: Vec<SeededConstraint>,
}

impl SeedSet {
    /// Builds a seed set, dropping constraints with invalid windows.
    pub fn new(constraints: Vec<SeededConstraint>) -> Self {
        let constraints = match validate_windows(&constraints) {
            Ok(()) => constraints,
            Err(errors) => {
                for e in &errors {
                    warn!(kind = ?e.kind, "{}", e.message);
                }
                constraints
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| !errors.iter().any(|e| e.index == Some(*i)))
                    .map(|(_, c)| c)
                    .collect()
            }
        };
        Self { constraints }
    }

    /// All constraints, in collection order.
    pub fn constraints(&self) -> &[SeededConstraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraint count per source.
    pub fn count_by_source(&self) -> HashMap<ConstraintSource, usize> {
        let mut counts = HashMap::new();
        for c in &self.constraints {
            *counts.entry(c.source).or_insert(0) += 1;
        }
        counts
    }

    /// Reserves every constraint in `tracker`.
    pub fn seed(&self, tracker: &mut OccupancyTracker) {
        for c in &self.constraints {
            tracker.reserve_constraint(c);
        }
    }
}

/// Reads the seeded constraints of a school from the store.
pub struct ConstraintSeeder;

impl ConstraintSeeder {
    /// Loads the constraints a run must respect.
    ///
    /// Published entries are always seeded. Pinned slots are seeded when
    /// `options.include_pinned`; unavailability windows when
    /// `options.honor_unavailability`. Reads are issued concurrently.
    pub async fn load(
        store: &dyn TimetableStore,
        school_id: &str,
        options: &GenerateOptions,
    ) -> SchedulerResult<SeedSet> {
        let include_pinned = options.include_pinned;
        let honor_unavailability = options.honor_unavailability;

        let (entries, pinned, staff_unavailable, room_unavailable) = tokio::try_join!(
            store.fetch_published_entries(school_id),
            async {
                if include_pinned {
                    store.fetch_pinned_slots(school_id).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if honor_unavailability {
                    store.fetch_staff_unavailability(school_id).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if honor_unavailability {
                    store.fetch_room_unavailability(school_id).await
                } else {
                    Ok(Vec::new())
                }
            },
        )?;

        let mut constraints = Vec::new();
        constraints.extend(entries.iter().flat_map(SeededConstraint::from_entry));
        constraints.extend(pinned.iter().flat_map(|p| p.constraints()));
        constraints.extend(staff_unavailable.iter().map(|u| u.for_staff()));
        constraints.extend(room_unavailable.iter().map(|u| u.for_room()));

        let seeds = SeedSet::new(constraints);
        debug!(
            school_id,
            entries = entries.len(),
            pinned = pinned.len(),
            staff_unavailable = staff_unavailable.len(),
            room_unavailable = room_unavailable.len(),
            constraints = seeds.len(),
            "collected seeded constraints"
        );
        Ok(seeds)
    }
}
