//! Resource occupancy tracking.
//!
//! Maps `(kind, resource id, weekday)` to the list of reserved
//! `[start, end)` intervals. Intervals are appended, never merged or
//! removed; only overlap queries are needed.
//!
//! A tracker belongs to exactly one run and is mutated in place by the
//! search, so it must not be shared between concurrent writers.

use std::collections::HashMap;

use crate::models::{ResourceKind, ResourceRef, SeededConstraint, TimeWindow};

type OccupancyKey = (ResourceKind, String, u8);

/// Reserved intervals per resource and day.
#[derive(Debug, Clone, Default)]
pub struct OccupancyTracker {
    intervals: HashMap<OccupancyKey, Vec<(u32, u32)>>,
    reservations: usize,
}

impl OccupancyTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `window` for a resource.
    pub fn reserve(&mut self, kind: ResourceKind, id: &str, window: &TimeWindow) {
        self.intervals
            .entry((kind, id.to_string(), window.day_of_week))
            .or_default()
            .push((window.start_minute, window.end_minute));
        self.reservations += 1;
    }

    /// Reserves a seeded constraint against its resource.
    pub fn reserve_constraint(&mut self, constraint: &SeededConstraint) {
        self.reserve_ref(&constraint.resource, &constraint.window);
    }

    /// Reserves `window` for a resource reference.
    pub fn reserve_ref(&mut self, resource: &ResourceRef, window: &TimeWindow) {
        self.reserve(resource.kind(), resource.id(), window);
    }

    /// Whether the resource has no reservation overlapping `window`.
    pub fn is_free(&self, kind: ResourceKind, id: &str, window: &TimeWindow) -> bool {
        let key = (kind, id.to_string(), window.day_of_week);
        match self.intervals.get(&key) {
            None => true,
            Some(list) => list.iter().all(|&(start, end)| {
                end <= window.start_minute || window.end_minute <= start
            }),
        }
    }

    /// Reserved intervals of a resource on a day, in reservation order.
    pub fn reserved(&self, kind: ResourceKind, id: &str, day_of_week: u8) -> &[(u32, u32)] {
        self.intervals
            .get(&(kind, id.to_string(), day_of_week))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of reservations made.
    pub fn reservation_count(&self) -> usize {
        self.reservations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConstraintSource;

    #[test]
    fn test_empty_tracker_is_free() {
        let t = OccupancyTracker::new();
        assert!(t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 480, 540)));
        assert_eq!(t.reservation_count(), 0);
    }

    #[test]
    fn test_reserve_blocks_overlap() {
        let mut t = OccupancyTracker::new();
        t.reserve(ResourceKind::Staff, "T1", &TimeWindow::new(1, 480, 540));

        assert!(!t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 480, 540)));
        assert!(!t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 510, 570)));
        assert!(!t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 420, 490)));
        assert!(!t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 490, 500)));
    }

    #[test]
    fn test_half_open_boundaries() {
        let mut t = OccupancyTracker::new();
        t.reserve(ResourceKind::Room, "R1", &TimeWindow::new(2, 480, 540));

        assert!(t.is_free(ResourceKind::Room, "R1", &TimeWindow::new(2, 540, 600)));
        assert!(t.is_free(ResourceKind::Room, "R1", &TimeWindow::new(2, 420, 480)));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut t = OccupancyTracker::new();
        let w = TimeWindow::new(3, 480, 540);
        t.reserve(ResourceKind::Section, "X", &w);

        // Other day, other kind with same id, other id.
        assert!(t.is_free(ResourceKind::Section, "X", &TimeWindow::new(4, 480, 540)));
        assert!(t.is_free(ResourceKind::Staff, "X", &w));
        assert!(t.is_free(ResourceKind::Section, "Y", &w));
    }

    #[test]
    fn test_reservations_accumulate() {
        let mut t = OccupancyTracker::new();
        t.reserve(ResourceKind::Staff, "T1", &TimeWindow::new(1, 480, 540));
        t.reserve(ResourceKind::Staff, "T1", &TimeWindow::new(1, 600, 660));
        t.reserve(ResourceKind::Staff, "T1", &TimeWindow::new(1, 480, 540));

        assert_eq!(
            t.reserved(ResourceKind::Staff, "T1", 1),
            &[(480, 540), (600, 660), (480, 540)]
        );
        assert!(t.reserved(ResourceKind::Staff, "T1", 2).is_empty());
        assert!(t.is_free(ResourceKind::Staff, "T1", &TimeWindow::new(1, 540, 600)));
        assert_eq!(t.reservation_count(), 3);
    }

    #[test]
    fn test_reserve_constraint() {
        let mut t = OccupancyTracker::new();
        let c = SeededConstraint::new(
            ResourceRef::Room("LAB".into()),
            TimeWindow::new(5, 600, 660),
            ConstraintSource::RoomUnavailable,
        );
        t.reserve_constraint(&c);
        assert!(!t.is_free(ResourceKind::Room, "LAB", &TimeWindow::new(5, 630, 690)));
        assert!(t.is_free(ResourceKind::Staff, "LAB", &TimeWindow::new(5, 630, 690)));
    }
}
