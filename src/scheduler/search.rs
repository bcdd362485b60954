//! First-fit placement search.
//!
//! # Algorithm
//!
//! For each requirement, each of its `periods_per_week` occurrences is
//! placed independently:
//! 1. Scan weekdays 1..=5, then candidate start minutes ascending.
//!    Days are ordered by how many occurrences of the same requirement
//!    they already hold, so lessons spread over the week before doubling up.
//!    A plain Monday-first scan would stack a requirement's lessons on the
//!    earliest days; with no other load all five would land on Monday.
//! 2. Skip the slot if the section is busy.
//! 3. Try eligible teachers in resolver order; for the first free one,
//!    pick a room if the requirement prefers a room type. If no room
//!    fits, try the next teacher in the same slot.
//! 4. Reserve section, teacher and room, record the placement, and move
//!    on to the next occurrence.
//!
//! An occurrence with no feasible combination stays unplaced. Committed
//! placements are never revisited (no backtracking).
//!
//! # Complexity
//! O(o * d * s * t * r) per run, where o = occurrences, d = days,
//! s = slots per day, t = eligible teachers, r = rooms.

use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{EligibleTeachers, OccupancyTracker, TimeGrid, SCHOOL_DAYS};
use crate::models::{Placement, Requirement, ResourceKind, Room, TimeWindow, Violation};

/// Room decision for one (slot, teacher) candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomChoice<'a> {
    /// The requirement has no room preference; no room is booked.
    NotRequired,
    /// A free room of the preferred type.
    Preferred(&'a Room),
    /// No preferred-type room was free; a free typeless room.
    Fallback(&'a Room),
    /// Neither branch found a free room.
    Unavailable,
}

/// Picks the room for `window`.
///
/// Rooms of another, non-matching type are never used.
pub fn choose_room<'a>(
    preferred_type: Option<&str>,
    rooms: &'a [Room],
    tracker: &OccupancyTracker,
    window: &TimeWindow,
) -> RoomChoice<'a> {
    let Some(room_type) = preferred_type else {
        return RoomChoice::NotRequired;
    };

    let is_free = |room: &&Room| tracker.is_free(ResourceKind::Room, &room.id, window);

    if let Some(room) = rooms.iter().filter(|r| r.has_type(room_type)).find(is_free) {
        return RoomChoice::Preferred(room);
    }
    if let Some(room) = rooms.iter().filter(|r| r.is_typeless()).find(is_free) {
        return RoomChoice::Fallback(room);
    }
    RoomChoice::Unavailable
}

/// Weekdays in scan order: fewest occurrences in `used` first, ties by day.
pub fn day_order(used: &[u8]) -> Vec<u8> {
    let mut days: Vec<u8> = SCHOOL_DAYS.collect();
    days.sort_by_key(|d| used.iter().filter(|u| *u == d).count());
    days
}

/// Result of a search pass.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Accepted placements, in placement order.
    pub placements: Vec<Placement>,
    /// Occurrences requested by the searched requirements.
    pub requested: usize,
    /// Occurrences left unplaced.
    pub unplaced: usize,
    /// Requirements skipped for lack of an eligible teacher.
    pub skipped_requirements: usize,
    /// Whether the wall-clock budget ran out.
    pub budget_exhausted: bool,
}

/// Greedy first-fit search over a seeded occupancy tracker.
#[derive(Debug, Clone)]
pub struct PlacementSearch {
    grid: TimeGrid,
    deadline: Option<Instant>,
}

impl PlacementSearch {
    /// Creates an unbounded search over `grid`.
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            deadline: None,
        }
    }

    /// Stops attempting new occurrences once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Places every occurrence of `requirements`, mutating `tracker`.
    pub fn run(
        &self,
        run_id: Uuid,
        requirements: &[Requirement],
        teachers: &EligibleTeachers,
        rooms: &[Room],
        tracker: &mut OccupancyTracker,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for req in requirements {
            let periods = req.periods_per_week as usize;
            outcome.requested += periods;

            let eligible = teachers.resolve(&req.subject_id, &req.class_id);
            if eligible.is_empty() {
                debug!(
                    section_id = %req.section_id,
                    subject_id = %req.subject_id,
                    "no eligible teacher, skipping requirement"
                );
                outcome.skipped_requirements += 1;
                outcome.unplaced += periods;
                continue;
            }

            let mut used_days: Vec<u8> = Vec::new();
            for occurrence in 0..periods {
                if outcome.budget_exhausted || self.out_of_time() {
                    outcome.budget_exhausted = true;
                    outcome.unplaced += periods - occurrence;
                    break;
                }

                let days = day_order(&used_days);
                match self.place_occurrence(run_id, req, &days, eligible, rooms, tracker) {
                    Some(p) => {
                        used_days.push(p.window.day_of_week);
                        debug!(
                            section_id = %p.section_id,
                            subject_id = %p.subject_id,
                            staff_id = %p.staff_id,
                            window = %p.window,
                            "placed occurrence"
                        );
                        outcome.placements.push(p);
                    }
                    None => {
                        warn!(
                            section_id = %req.section_id,
                            subject_id = %req.subject_id,
                            occurrence = occurrence + 1,
                            of = periods,
                            "no feasible slot for occurrence"
                        );
                        outcome.unplaced += 1;
                    }
                }
            }
        }

        if outcome.budget_exhausted {
            warn!(
                placed = outcome.placements.len(),
                unplaced = outcome.unplaced,
                "search time budget exhausted"
            );
        }
        outcome
    }

    /// Places a single occurrence at the first feasible slot.
    ///
    /// Days are scanned in the given order, start minutes ascending.
    /// On success the section, teacher and room (if any) are reserved in
    /// `tracker`; on failure `tracker` is unchanged.
    pub fn place_occurrence(
        &self,
        run_id: Uuid,
        req: &Requirement,
        days: &[u8],
        eligible: &[String],
        rooms: &[Room],
        tracker: &mut OccupancyTracker,
    ) -> Option<Placement> {
        let starts = self.grid.candidate_starts(req.duration_minutes);
        for &day in days {
            for &start in &starts {
                let window = TimeWindow::starting_at(day, start, req.duration_minutes);
                if !tracker.is_free(ResourceKind::Section, &req.section_id, &window) {
                    continue;
                }

                for staff_id in eligible {
                    if !tracker.is_free(ResourceKind::Staff, staff_id, &window) {
                        continue;
                    }

                    let mut placement =
                        Placement::new(run_id, &req.section_id, &req.subject_id, staff_id, window);
                    match choose_room(req.preferred_room_type.as_deref(), rooms, tracker, &window)
                    {
                        RoomChoice::Unavailable => continue,
                        RoomChoice::NotRequired => {}
                        RoomChoice::Preferred(room) => {
                            placement = placement.with_room(&room.id);
                        }
                        RoomChoice::Fallback(room) => {
                            let preferred = req.preferred_room_type.as_deref().unwrap_or_default();
                            placement = placement
                                .with_room(&room.id)
                                .with_violation(Violation::room_type_fallback(&room.id, preferred));
                        }
                    }

                    tracker.reserve(ResourceKind::Section, &req.section_id, &window);
                    tracker.reserve(ResourceKind::Staff, staff_id, &window);
                    if let Some(room_id) = &placement.room_id {
                        tracker.reserve(ResourceKind::Room, room_id, &window);
                    }
                    return Some(placement);
                }
            }
        }
        None
    }
}
