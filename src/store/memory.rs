//! In-memory store adapter.
//!
//! Keeps every record in `tokio` locks. Used by tests and by applications
//! that embed the generator without a database. Persistence of a run's
//! output stages nothing partially: all locks are taken first, then both
//! row sets are written.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{StoreResult, TimetableStore};
use crate::error::StoreError;
use crate::models::{
    PinnedSlot, Placement, Requirement, Room, Run, School, TeacherQualification, TimetableEntry,
    UnavailabilityWindow,
};

#[derive(Debug, Clone)]
struct SchoolData {
    school: School,
    requirements: Vec<Requirement>,
    qualifications: Vec<TeacherQualification>,
    rooms: Vec<Room>,
    entries: Vec<TimetableEntry>,
    pinned: Vec<PinnedSlot>,
    staff_unavailability: Vec<UnavailabilityWindow>,
    room_unavailability: Vec<UnavailabilityWindow>,
}

impl SchoolData {
    fn new(school: School) -> Self {
        Self {
            school,
            requirements: Vec::new(),
            qualifications: Vec::new(),
            rooms: Vec::new(),
            entries: Vec::new(),
            pinned: Vec::new(),
            staff_unavailability: Vec::new(),
            room_unavailability: Vec::new(),
        }
    }
}

/// `TimetableStore` backed by process memory.
///
/// # Example
///
/// ```
/// use timetable_engine::models::{Requirement, School, TeacherQualification};
/// use timetable_engine::store::InMemoryStore;
///
/// let store = InMemoryStore::new()
///     .with_school(School::new("sch").with_hours("08:00", "15:00"))
///     .with_requirement("sch", Requirement::new("S1", "MATH", "G7").with_periods(5))
///     .with_qualification("sch", TeacherQualification::any_class("T1", "MATH"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schools: RwLock<HashMap<String, SchoolData>>,
    runs: RwLock<HashMap<Uuid, Run>>,
    placements: RwLock<HashMap<Uuid, Vec<Placement>>>,
    fail_next_persist: AtomicBool,
    fail_next_read: AtomicBool,
    fail_next_update: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn school_mut(&mut self, school_id: &str) -> &mut SchoolData {
        self.schools
            .get_mut()
            .entry(school_id.to_string())
            .or_insert_with(|| SchoolData::new(School::new(school_id)))
    }

    /// Adds or replaces a school, keeping its existing records.
    pub fn with_school(mut self, school: School) -> Self {
        let id = school.id.clone();
        self.school_mut(&id).school = school;
        self
    }

    /// Adds a requirement.
    pub fn with_requirement(mut self, school_id: &str, requirement: Requirement) -> Self {
        self.school_mut(school_id).requirements.push(requirement);
        self
    }

    /// Adds a teacher qualification.
    pub fn with_qualification(mut self, school_id: &str, q: TeacherQualification) -> Self {
        self.school_mut(school_id).qualifications.push(q);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, school_id: &str, room: Room) -> Self {
        self.school_mut(school_id).rooms.push(room);
        self
    }

    /// Adds a published entry.
    pub fn with_entry(mut self, school_id: &str, entry: TimetableEntry) -> Self {
        self.school_mut(school_id).entries.push(entry);
        self
    }

    /// Adds a pinned slot.
    pub fn with_pinned(mut self, school_id: &str, slot: PinnedSlot) -> Self {
        self.school_mut(school_id).pinned.push(slot);
        self
    }

    /// Adds a staff unavailability window.
    pub fn with_staff_unavailability(mut self, school_id: &str, u: UnavailabilityWindow) -> Self {
        self.school_mut(school_id).staff_unavailability.push(u);
        self
    }

    /// Adds a room unavailability window.
    pub fn with_room_unavailability(mut self, school_id: &str, u: UnavailabilityWindow) -> Self {
        self.school_mut(school_id).room_unavailability.push(u);
        self
    }

    /// Makes the next `persist_run_output` call fail without writing.
    pub fn fail_next_persist(&self) {
        self.fail_next_persist.store(true, Ordering::SeqCst);
    }

    /// Makes the next requirement or constraint read fail with
    /// `StoreError::Unavailable`. School lookups are not affected.
    pub fn fail_next_read(&self) {
        self.fail_next_read.store(true, Ordering::SeqCst);
    }

    /// Makes the next `update_run` call fail without writing.
    pub fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }

    fn check_read(&self, what: &str) -> StoreResult<()> {
        if self.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("injected failure reading {what}")));
        }
        Ok(())
    }

    /// Returns a stored run.
    pub async fn run(&self, run_id: Uuid) -> Option<Run> {
        self.runs.read().await.get(&run_id).cloned()
    }

    /// Returns all stored runs of a school.
    pub async fn runs_for_school(&self, school_id: &str) -> Vec<Run> {
        let mut runs: Vec<Run> = self
            .runs
            .read()
            .await
            .values()
            .filter(|r| r.school_id == school_id)
            .cloned()
            .collect();
        runs.sort_by_key(|r| r.created_at);
        runs
    }

    /// Returns the placements stored for a run.
    pub async fn placements(&self, run_id: Uuid) -> Vec<Placement> {
        self.placements
            .read()
            .await
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the published timetable of a school.
    pub async fn published_entries(&self, school_id: &str) -> Vec<TimetableEntry> {
        self.schools
            .read()
            .await
            .get(school_id)
            .map(|d| d.entries.clone())
            .unwrap_or_default()
    }

    async fn read_school<T>(
        &self,
        school_id: &str,
        f: impl FnOnce(&SchoolData) -> Vec<T>,
    ) -> Vec<T> {
        self.schools
            .read()
            .await
            .get(school_id)
            .map(f)
            .unwrap_or_default()
    }
}

#[async_trait]
impl TimetableStore for InMemoryStore {
    async fn fetch_school(&self, school_id: &str) -> StoreResult<Option<School>> {
        Ok(self
            .schools
            .read()
            .await
            .get(school_id)
            .map(|d| d.school.clone()))
    }

    async fn fetch_requirements(
        &self,
        school_id: &str,
        section_ids: Option<&[String]>,
    ) -> StoreResult<Vec<Requirement>> {
        self.check_read("requirements")?;
        Ok(self
            .read_school(school_id, |d| {
                d.requirements
                    .iter()
                    .filter(|r| section_ids.is_none_or(|ids| ids.contains(&r.section_id)))
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn fetch_teacher_qualifications(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<TeacherQualification>> {
        self.check_read("qualifications")?;
        Ok(self
            .read_school(school_id, |d| d.qualifications.clone())
            .await)
    }

    async fn fetch_rooms(&self, school_id: &str) -> StoreResult<Vec<Room>> {
        self.check_read("rooms")?;
        Ok(self.read_school(school_id, |d| d.rooms.clone()).await)
    }

    async fn fetch_published_entries(&self, school_id: &str) -> StoreResult<Vec<TimetableEntry>> {
        self.check_read("published entries")?;
        Ok(self.read_school(school_id, |d| d.entries.clone()).await)
    }

    async fn fetch_pinned_slots(&self, school_id: &str) -> StoreResult<Vec<PinnedSlot>> {
        self.check_read("pinned slots")?;
        Ok(self.read_school(school_id, |d| d.pinned.clone()).await)
    }

    async fn fetch_staff_unavailability(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<UnavailabilityWindow>> {
        self.check_read("staff unavailability")?;
        Ok(self
            .read_school(school_id, |d| d.staff_unavailability.clone())
            .await)
    }

    async fn fetch_room_unavailability(
        &self,
        school_id: &str,
    ) -> StoreResult<Vec<UnavailabilityWindow>> {
        self.check_read("room unavailability")?;
        Ok(self
            .read_school(school_id, |d| d.room_unavailability.clone())
            .await)
    }

    async fn create_run(&self, run: &Run) -> StoreResult<()> {
        self.runs.write().await.insert(run.id, run.clone());
        Ok(())
    }

    async fn update_run(&self, run: &Run) -> StoreResult<()> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "injected failure updating run {}",
                run.id
            )));
        }
        let mut runs = self.runs.write().await;
        match runs.get_mut(&run.id) {
            Some(slot) => {
                *slot = run.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("run {}", run.id))),
        }
    }

    async fn persist_run_output(
        &self,
        run_id: Uuid,
        school_id: &str,
        placements: &[Placement],
        entries: &[TimetableEntry],
    ) -> StoreResult<()> {
        let mut schools = self.schools.write().await;
        let mut stored = self.placements.write().await;

        if self.fail_next_persist.swap(false, Ordering::SeqCst) {
            return Err(StoreError::TransactionAborted(
                "injected persistence failure".into(),
            ));
        }
        let data = schools
            .get_mut(school_id)
            .ok_or_else(|| StoreError::NotFound(format!("school {school_id}")))?;
        if stored.contains_key(&run_id) {
            return Err(StoreError::TransactionAborted(format!(
                "placements of run {run_id} already stored"
            )));
        }

        stored.insert(run_id, placements.to_vec());
        data.entries.extend_from_slice(entries);
        debug!(
            run_id = %run_id,
            placements = placements.len(),
            entries = entries.len(),
            "committed run output"
        );
        Ok(())
    }
}
