//! Abstract store boundary.
//!
//! The generator never talks to a database directly. It reads school data
//! and writes run results through [`TimetableStore`], which the embedding
//! application implements over its persistence technology.
//!
//! # Contract
//!
//! - All `fetch_*` methods are read-only and may be called concurrently.
//! - [`TimetableStore::persist_run_output`] is a single all-or-nothing
//!   transaction: either every placement and entry of the run becomes
//!   durable, or none does.
//! - Row order returned by `fetch_requirements` and
//!   `fetch_teacher_qualifications` must be stable; it fixes the search
//!   order and therefore the result.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    PinnedSlot, Placement, Requirement, Room, Run, School, TeacherQualification, TimetableEntry,
    UnavailabilityWindow,
};

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access operations needed by the timetable generator.
#[async_trait]
pub trait TimetableStore: Send + Sync {
    /// Fetches a school and its operating hours.
    async fn fetch_school(&self, school_id: &str) -> StoreResult<Option<School>>;

    /// Fetches the scheduling requirements of a school.
    ///
    /// `section_ids = Some(..)` restricts the result to those sections.
    async fn fetch_requirements(
        &self,
        school_id: &str,
        section_ids: Option<&[String]>,
    ) -> StoreResult<Vec<Requirement>>;

    /// Fetches the staff-to-subject qualification relation.
    async fn fetch_teacher_qualifications(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<TeacherQualification>>;

    /// Fetches the school's rooms.
    async fn fetch_rooms(&self, school_id: &str) -> StoreResult<Vec<Room>>;

    /// Fetches the currently published timetable.
    async fn fetch_published_entries(&self, school_id: &str) -> StoreResult<Vec<TimetableEntry>>;

    /// Fetches pinned slots.
    async fn fetch_pinned_slots(&self, school_id: &str) -> StoreResult<Vec<PinnedSlot>>;

    /// Fetches staff unavailability windows (`resource_id` = staff id).
    async fn fetch_staff_unavailability(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<UnavailabilityWindow>>;

    /// Fetches room unavailability windows (`resource_id` = room id).
    async fn fetch_room_unavailability(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<UnavailabilityWindow>>;

    /// Inserts a new run record.
    async fn create_run(&self, run: &Run) -> StoreResult<()>;

    /// Replaces an existing run record.
    async fn update_run(&self, run: &Run) -> StoreResult<()>;

    /// Atomically stores a run's placements and publishes its entries.
    async fn persist_run_output(
        &self,
        run_id: Uuid,
        school_id: &str,
        placements: &[Placement],
        entries: &[TimetableEntry],
    ) -> StoreResult<()>;
}
