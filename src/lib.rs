//! Weekly school timetable generation.
//!
//! Places every weekly lesson occurrence of a school's requirements into a
//! Monday-to-Friday grid without double-booking any section, teacher or
//! room, and without touching slots already reserved by the published
//! timetable, pinned slots or unavailability windows.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWindow`, `Requirement`,
//!   `TeacherQualification`, `Room`, `Placement`, `TimetableEntry`,
//!   `SeededConstraint`, `Run`
//! - **`scheduler`**: Time grid, occupancy tracker, loaders, first-fit
//!   search and the [`TimetableGenerator`] entry point
//! - **`store`**: The async [`store::TimetableStore`] boundary and an
//!   in-memory adapter
//! - **`validation`**: Input integrity checks (period counts, durations,
//!   duplicates, window bounds)
//! - **`options`**: Per-run [`GenerateOptions`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use timetable_engine::models::{Requirement, School, TeacherQualification};
//! use timetable_engine::store::InMemoryStore;
//! use timetable_engine::{GenerateOptions, TimetableGenerator};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), timetable_engine::SchedulerError> {
//! let store = InMemoryStore::new()
//!     .with_school(School::new("sch").with_hours("08:00", "15:00"))
//!     .with_requirement("sch", Requirement::new("S1", "MATH", "G7").with_periods(3))
//!     .with_qualification("sch", TeacherQualification::any_class("T1", "MATH"));
//!
//! let outcome = TimetableGenerator::new(Arc::new(store))
//!     .generate_timetable("sch", GenerateOptions::default())
//!     .await?;
//! assert_eq!(outcome.placed_count, 3);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod options;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use error::{SchedulerError, SchedulerResult, StoreError};
pub use options::GenerateOptions;
pub use scheduler::TimetableGenerator;
