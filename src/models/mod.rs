//! Timetable domain models.
//!
//! Provides the data types shared by the engine components and the store
//! boundary: time windows, resources, requirements, seeded constraints,
//! placements and the run ledger.
//!
//! # Domain Mappings
//!
//! | timetable-engine | School |
//! |------------------|--------|
//! | Requirement | Weekly lessons of a subject for a section |
//! | Occurrence | One of those lessons |
//! | ResourceRef | Section, teacher or room |
//! | Placement | Lesson proposed by a run |
//! | TimetableEntry | Published lesson |

mod calendar;
mod constraint;
mod requirement;
mod resource;
mod run;
mod schedule;

pub use calendar::{format_minutes, TimeWindow, FRIDAY, MONDAY};
pub use constraint::{ConstraintSource, PinnedSlot, SeededConstraint, UnavailabilityWindow};
pub use requirement::{Requirement, TeacherQualification};
pub use resource::{ResourceKind, ResourceRef, Room};
pub use run::{Run, RunStatus, School};
pub use schedule::{
    find_double_bookings, DoubleBooking, Placement, TimetableEntry, Violation, ViolationType,
    FULL_SCORE,
};
