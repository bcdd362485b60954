//! Timetable generation engine.
//!
//! Components, in the order a run uses them:
//!
//! - [`TimeGrid`]: candidate lesson start times for a school day,
//!   stepped by [`SLOT_GRANULARITY_MINUTES`] over [`SCHOOL_DAYS`].
//! - [`RequirementLoader`]: requirements, eligible teachers and rooms.
//! - [`ConstraintSeeder`]: published entries, pinned slots and
//!   unavailability windows that reserve resources up front.
//! - [`OccupancyTracker`]: per-resource, per-day reserved intervals.
//! - [`PlacementSearch`]: greedy first-fit placement of every occurrence.
//! - [`RunMetrics`]: run summary stored on the run ledger.
//! - [`TimetableGenerator`]: the entry point that runs all of the above.
//!
//! # Algorithm
//!
//! First-fit, non-backtracking. An occurrence is committed at the first
//! (day, start, teacher, room) that keeps every resource free, and is
//! never moved afterwards. The result is deterministic for a fixed store
//! order, but not optimal.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

mod engine;
mod grid;
mod kpi;
mod loader;
mod occupancy;
mod search;
mod seeder;

pub use engine::{GenerationOutcome, TimetableGenerator};
pub use grid::{parse_hhmm, OperatingHours, TimeGrid, SCHOOL_DAYS, SLOT_GRANULARITY_MINUTES};
pub use kpi::RunMetrics;
pub use loader::{EligibleTeachers, LoadedRequirements, RequirementLoader};
pub use occupancy::OccupancyTracker;
pub use search::{choose_room, day_order, PlacementSearch, RoomChoice, SearchOutcome};
pub use seeder::{ConstraintSeeder, SeedSet};
