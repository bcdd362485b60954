//! Timetable generation entry point.
//!
//! Ties the components together for one run:
//! 1. Resolve the school's operating hours and build the [`TimeGrid`].
//! 2. Record a `RUNNING` run.
//! 3. Load requirements and seeded constraints concurrently.
//! 4. Seed a fresh [`OccupancyTracker`] and run the [`PlacementSearch`].
//! 5. Persist placements and entries in one transaction, then close the run.
//!
//! A missing school or missing operating hours aborts before any run is
//! recorded. Once the run exists, every failure before the output is
//! persisted leaves it `FAILED`. After that the run always succeeds.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{
    ConstraintSeeder, OccupancyTracker, OperatingHours, PlacementSearch, RequirementLoader,
    RunMetrics, TimeGrid,
};
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{Run, TimetableEntry};
use crate::options::GenerateOptions;
use crate::store::TimetableStore;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Identifier of the recorded run.
    pub run_id: Uuid,
    /// Occurrences placed.
    pub placed_count: usize,
    /// Occurrences requested.
    pub requested_count: usize,
    /// Entries published by the run, in placement order.
    pub entries: Vec<TimetableEntry>,
    /// Full run metrics.
    pub metrics: RunMetrics,
}

/// Generates weekly timetables against a [`TimetableStore`].
///
/// Runs for the same school must not execute concurrently; each run reads
/// the entries published by the previous one.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use timetable_engine::models::{Requirement, School, TeacherQualification};
/// use timetable_engine::store::InMemoryStore;
/// use timetable_engine::{GenerateOptions, TimetableGenerator};
///
/// let store = InMemoryStore::new()
///     .with_school(School::new("sch").with_hours("08:00", "15:00"))
///     .with_requirement("sch", Requirement::new("S1", "MATH", "G7").with_periods(5))
///     .with_qualification("sch", TeacherQualification::any_class("T1", "MATH"));
/// let generator = TimetableGenerator::new(Arc::new(store));
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let outcome = rt
///     .block_on(generator.generate_timetable("sch", GenerateOptions::default()))
///     .unwrap();
/// assert_eq!(outcome.placed_count, 5);
/// ```
pub struct TimetableGenerator {
    store: Arc<dyn TimetableStore>,
}

impl TimetableGenerator {
    /// Creates a generator over `store`.
    pub fn new(store: Arc<dyn TimetableStore>) -> Self {
        Self { store }
    }

    /// Runs the generator for one school.
    ///
    /// Returns `placed_count <= requested_count`; a shortfall is not an
    /// error. Errors are precondition failures (no run recorded), store
    /// read failures and persistence failures (run recorded as `FAILED`).
    pub async fn generate_timetable(
        &self,
        school_id: &str,
        options: GenerateOptions,
    ) -> SchedulerResult<GenerationOutcome> {
        let school = self
            .store
            .fetch_school(school_id)
            .await?
            .ok_or_else(|| SchedulerError::SchoolNotFound {
                school_id: school_id.to_string(),
            })?;
        let grid = TimeGrid::new(OperatingHours::resolve(&school, &options)?);

        let mut run = Run::start(school_id, options);
        self.store.create_run(&run).await?;

        let span = info_span!("generate_timetable", school_id, run_id = %run.id);
        self.execute(&mut run, grid).instrument(span).await
    }

    async fn execute(&self, run: &mut Run, grid: TimeGrid) -> SchedulerResult<GenerationOutcome> {
        let started = Instant::now();
        let school_id = run.school_id.clone();
        let options = run.options.clone();
        info!(
            open = grid.hours().start_minute,
            close = grid.hours().end_minute,
            "run started"
        );

        let loaded = tokio::try_join!(
            RequirementLoader::load(self.store.as_ref(), &school_id, &options),
            ConstraintSeeder::load(self.store.as_ref(), &school_id, &options),
        );
        let (loaded, seeds) = match loaded {
            Ok(pair) => pair,
            Err(e) => {
                self.abort(run, RunMetrics::default(), &e).await;
                return Err(e);
            }
        };

        let mut tracker = OccupancyTracker::new();
        seeds.seed(&mut tracker);

        let mut search = PlacementSearch::new(grid);
        if let Some(budget) = options.time_budget() {
            search = search.with_deadline(started + budget);
        }
        let outcome = search.run(
            run.id,
            &loaded.requirements,
            &loaded.teachers,
            &loaded.rooms,
            &mut tracker,
        );

        let metrics = RunMetrics::calculate(&outcome, loaded.rejected, seeds.len());
        let entries: Vec<TimetableEntry> =
            outcome.placements.iter().map(TimetableEntry::from).collect();

        if let Err(source) = self
            .store
            .persist_run_output(run.id, &school_id, &outcome.placements, &entries)
            .await
        {
            error!(error = %source, "failed to persist run output");
            let err = SchedulerError::Persistence {
                run_id: run.id,
                source,
            };
            self.abort(run, metrics, &err).await;
            return Err(err);
        }

        run.succeed(metrics.clone())?;
        self.record_success(run).await;
        info!(
            placed = metrics.placed_count,
            requested = metrics.requested_count,
            skipped = metrics.skipped_requirements,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run succeeded"
        );

        Ok(GenerationOutcome {
            run_id: run.id,
            placed_count: metrics.placed_count,
            requested_count: metrics.requested_count,
            entries,
            metrics,
        })
    }

    /// Stores the succeeded run, retrying once. The output is already
    /// published at this point, so a failure is logged and not returned.
    async fn record_success(&self, run: &Run) {
        if let Err(e) = self.store.update_run(run).await {
            warn!(error = %e, "failed to record run success, retrying");
            if let Err(e) = self.store.update_run(run).await {
                error!(error = %e, "failed to record run success");
            }
        }
    }

    /// Records the run as failed. Errors here are logged, not returned.
    async fn abort(&self, run: &mut Run, metrics: RunMetrics, cause: &SchedulerError) {
        if let Err(e) = run.fail(metrics, cause.to_string()) {
            warn!(error = %e, "run already finished");
            return;
        }
        if let Err(e) = self.store.update_run(run).await {
            error!(error = %e, "failed to record run failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{
        find_double_bookings, PinnedSlot, Requirement, Room, RunStatus, School,
        TeacherQualification, TimeWindow, UnavailabilityWindow,
    };
    use crate::store::{InMemoryStore, TimetableStore};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;
    use std::time::Duration;

    fn school() -> School {
        School::new("sch").with_hours("08:00", "15:00")
    }

    fn single_teacher_store(periods: u32) -> InMemoryStore {
        InMemoryStore::new()
            .with_school(school())
            .with_requirement("sch", Requirement::new("S1", "MATH", "G7").with_periods(periods))
            .with_qualification("sch", TeacherQualification::any_class("T1", "MATH"))
    }

    fn windows(entries: &[TimetableEntry]) -> Vec<(u8, u32, u32)> {
        entries
            .iter()
            .map(|e| (e.window.day_of_week, e.window.start_minute, e.window.end_minute))
            .collect()
    }

    async fn generate(store: &Arc<InMemoryStore>, options: GenerateOptions) -> GenerationOutcome {
        TimetableGenerator::new(store.clone())
            .generate_timetable("sch", options)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_one_lesson_per_weekday_at_first_slot() {
        let store = Arc::new(single_teacher_store(5));
        let out = generate(&store, GenerateOptions::default()).await;

        assert_eq!(out.placed_count, 5);
        assert_eq!(out.requested_count, 5);
        assert_eq!(
            windows(&out.entries),
            vec![
                (1, 480, 540),
                (2, 480, 540),
                (3, 480, 540),
                (4, 480, 540),
                (5, 480, 540)
            ]
        );

        let run = store.run(out.run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Succeeded);
        assert_eq!(run.metrics.unwrap().placed_count, 5);
        assert_eq!(store.placements(out.run_id).await.len(), 5);
        assert_eq!(store.published_entries("sch").await, out.entries);
    }

    #[tokio::test]
    async fn test_teacher_unavailable_mornings() {
        let mut store = single_teacher_store(5);
        for day in 1..=5 {
            store = store.with_staff_unavailability(
                "sch",
                UnavailabilityWindow::new("T1", TimeWindow::new(day, 480, 540)),
            );
        }
        let store = Arc::new(store);
        let out = generate(&store, GenerateOptions::default()).await;

        assert_eq!(out.placed_count, 5);
        for e in &out.entries {
            assert!(e.window.start_minute >= 540, "{}", e.window);
        }
        let days: Vec<u8> = out.entries.iter().map(|e| e.window.day_of_week).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_overloaded_teacher_leaves_shortfall() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_school(School::new("sch").with_hours("08:00", "10:00"))
                .with_requirement("sch", Requirement::new("S1", "MATH", "G7").with_periods(6))
                .with_requirement("sch", Requirement::new("S2", "MATH", "G7").with_periods(6))
                .with_qualification("sch", TeacherQualification::any_class("T1", "MATH")),
        );
        let out = generate(&store, GenerateOptions::default()).await;

        assert_eq!(out.requested_count, 12);
        assert_eq!(out.placed_count, 10);
        assert!(out.placed_count < out.requested_count);
        assert!(find_double_bookings(&out.entries).is_empty());
        assert_eq!(out.metrics.unplaced_occurrences, 2);
    }

    #[tokio::test]
    async fn test_requirement_without_teacher_is_skipped() {
        let store = Arc::new(
            single_teacher_store(3).with_requirement("sch", Requirement::new("S1", "LATIN", "G7")),
        );
        let out = generate(&store, GenerateOptions::default()).await;

        assert_eq!(out.requested_count, 4);
        assert_eq!(out.placed_count, 3);
        assert_eq!(out.metrics.skipped_requirements, 1);
        assert!(out.entries.iter().all(|e| e.subject_id == "MATH"));
    }

    #[tokio::test]
    async fn test_published_entries_are_respected() {
        let store = Arc::new(
            single_teacher_store(1).with_entry(
                "sch",
                TimetableEntry::new("S1", "ENG", "T2", TimeWindow::new(1, 480, 540)),
            ),
        );
        let out = generate(&store, GenerateOptions::default()).await;
        assert_eq!(windows(&out.entries), vec![(1, 540, 600)]);
        assert!(find_double_bookings(&store.published_entries("sch").await).is_empty());
    }

    #[tokio::test]
    async fn test_second_run_builds_on_first() {
        let store = Arc::new(single_teacher_store(5));
        let first = generate(&store, GenerateOptions::default()).await;
        let second = generate(&store, GenerateOptions::default()).await;

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(second.placed_count, 5);
        assert!(second.entries.iter().all(|e| e.window.start_minute == 540));
        assert!(find_double_bookings(&store.published_entries("sch").await).is_empty());
        assert_eq!(store.runs_for_school("sch").await.len(), 2);
    }

    #[tokio::test]
    async fn test_pinned_slots_toggle() {
        let build = || {
            Arc::new(single_teacher_store(1).with_pinned(
                "sch",
                PinnedSlot::new("S9", "PE", TimeWindow::new(1, 480, 540)).with_staff("T1"),
            ))
        };

        let pinned = generate(&build(), GenerateOptions::default()).await;
        assert_eq!(windows(&pinned.entries), vec![(1, 540, 600)]);

        let ignored = generate(&build(), GenerateOptions::default().with_pinned(false)).await;
        assert_eq!(windows(&ignored.entries), vec![(1, 480, 540)]);
    }

    #[tokio::test]
    async fn test_unavailability_toggle() {
        let store = Arc::new(single_teacher_store(1).with_staff_unavailability(
            "sch",
            UnavailabilityWindow::new("T1", TimeWindow::new(1, 480, 600)),
        ));
        let out = generate(&store, GenerateOptions::default().with_unavailability(false)).await;
        assert_eq!(windows(&out.entries), vec![(1, 480, 540)]);
    }

    #[tokio::test]
    async fn test_target_sections() {
        let store = Arc::new(
            single_teacher_store(2)
                .with_requirement("sch", Requirement::new("S2", "MATH", "G7").with_periods(2)),
        );
        let out = generate(&store, GenerateOptions::default().with_sections(["S2"])).await;
        assert_eq!(out.requested_count, 2);
        assert!(out.entries.iter().all(|e| e.section_id == "S2"));
    }

    #[tokio::test]
    async fn test_preferred_room_and_fallback() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_school(school())
                .with_requirement(
                    "sch",
                    Requirement::new("S1", "CHEM", "G7").with_room_type("lab"),
                )
                .with_requirement(
                    "sch",
                    Requirement::new("S2", "CHEM", "G7").with_room_type("lab"),
                )
                .with_qualification("sch", TeacherQualification::any_class("T1", "CHEM"))
                .with_qualification("sch", TeacherQualification::any_class("T2", "CHEM"))
                .with_room("sch", Room::new("LAB1").with_type("lab"))
                .with_room("sch", Room::new("GYM").with_type("gym"))
                .with_room("sch", Room::new("R101")),
        );
        let out = generate(&store, GenerateOptions::default()).await;

        assert_eq!(out.placed_count, 2);
        assert_eq!(out.entries[0].room_id.as_deref(), Some("LAB1"));
        assert_eq!(out.entries[1].room_id.as_deref(), Some("R101"));
        assert_eq!(out.metrics.fallback_rooms, 1);
        assert!(out.entries.iter().all(|e| e.room_id.as_deref() != Some("GYM")));
    }

    #[tokio::test]
    async fn test_hours_override() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_school(School::new("sch"))
                .with_requirement("sch", Requirement::new("S1", "MATH", "G7"))
                .with_qualification("sch", TeacherQualification::any_class("T1", "MATH")),
        );
        let out = generate(&store, GenerateOptions::default().with_hours("09:30", "12:00")).await;
        assert_eq!(windows(&out.entries), vec![(1, 570, 630)]);
    }

    #[tokio::test]
    async fn test_missing_school_records_no_run() {
        let store = Arc::new(InMemoryStore::new());
        let err = TimetableGenerator::new(store.clone())
            .generate_timetable("nope", GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::SchoolNotFound { .. }));
        assert!(err.is_fatal());
        assert!(store.runs_for_school("nope").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_hours_records_no_run() {
        let store = Arc::new(
            InMemoryStore::new()
                .with_school(School::new("sch"))
                .with_requirement("sch", Requirement::new("S1", "MATH", "G7")),
        );
        let err = TimetableGenerator::new(store.clone())
            .generate_timetable("sch", GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::OperatingHoursMissing { .. }));
        assert!(store.runs_for_school("sch").await.is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_marks_run_failed() {
        let store = Arc::new(single_teacher_store(5));
        store.fail_next_persist();

        let err = TimetableGenerator::new(store.clone())
            .generate_timetable("sch", GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Persistence {
                source: StoreError::TransactionAborted(_),
                ..
            }
        ));
        assert!(err.is_retryable());

        let runs = store.runs_for_school("sch").await;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert!(runs[0].error.is_some());
        assert_eq!(runs[0].metrics.as_ref().unwrap().placed_count, 5);
        assert!(store.placements(runs[0].id).await.is_empty());
        assert!(store.published_entries("sch").await.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_marks_run_failed() {
        let store = Arc::new(single_teacher_store(5));
        store.fail_next_read();

        let err = TimetableGenerator::new(store.clone())
            .generate_timetable("sch", GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Store(StoreError::Unavailable(_))));
        assert!(err.is_retryable());

        let runs = store.runs_for_school("sch").await;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Failed);
        assert!(runs[0].error.is_some());
        assert!(store.published_entries("sch").await.is_empty());
    }

    #[tokio::test]
    async fn test_status_update_failure_after_persist_still_succeeds() {
        let store = Arc::new(single_teacher_store(5));
        store.fail_next_update();

        let out = generate(&store, GenerateOptions::default()).await;
        assert_eq!(out.placed_count, 5);

        let run = store.run(out.run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Succeeded);
        assert!(run.finished_at.is_some());
        assert_eq!(store.published_entries("sch").await.len(), 5);
    }

    #[tokio::test]
    async fn test_zero_budget_places_nothing() {
        let store = Arc::new(single_teacher_store(5));
        let out = generate(&store, GenerateOptions::default().with_time_budget(Duration::ZERO)).await;
        assert_eq!(out.placed_count, 0);
        assert_eq!(out.requested_count, 5);
        assert!(out.metrics.budget_exhausted);
        assert_eq!(
            store.run(out.run_id).await.unwrap().status,
            RunStatus::Succeeded
        );
    }

    #[tokio::test]
    async fn test_empty_school_succeeds() {
        let store = Arc::new(InMemoryStore::new().with_school(school()));
        let out = generate(&store, GenerateOptions::default()).await;
        assert_eq!(out.placed_count, 0);
        assert_eq!(out.requested_count, 0);
        assert!(out.entries.is_empty());
    }

    fn random_store(seed: u64) -> InMemoryStore {
        let mut rng = StdRng::seed_from_u64(seed);
        let subjects = ["MATH", "ENG", "SCI", "HIST", "ART", "CHEM"];
        let durations = [30, 45, 60, 90];

        let mut store = InMemoryStore::new()
            .with_school(School::new("sch").with_hours("08:00", "14:00"))
            .with_room("sch", Room::new("LAB1").with_type("lab"))
            .with_room("sch", Room::new("LAB2").with_type("lab"))
            .with_room("sch", Room::new("R1"))
            .with_room("sch", Room::new("R2"))
            .with_room_unavailability(
                "sch",
                UnavailabilityWindow::new("LAB1", TimeWindow::new(2, 480, 840)),
            )
            .with_room_unavailability(
                "sch",
                UnavailabilityWindow::new("R1", TimeWindow::new(4, 600, 720)),
            );

        for t in 0..8 {
            for subject in subjects {
                if rng.random_range(0..3) == 0 {
                    store = store.with_qualification(
                        "sch",
                        TeacherQualification::any_class(format!("T{t}"), subject),
                    );
                }
            }
            let day = rng.random_range(1..=5u8);
            let start = 480 + 30 * rng.random_range(0..8u32);
            store = store.with_staff_unavailability(
                "sch",
                UnavailabilityWindow::new(format!("T{t}"), TimeWindow::new(day, start, start + 90)),
            );
        }

        for s in 0..10 {
            for subject in subjects {
                if rng.random_range(0..2) == 0 {
                    continue;
                }
                let mut req = Requirement::new(format!("S{s}"), subject, format!("G{}", s % 3))
                    .with_periods(rng.random_range(1..=5))
                    .with_duration(durations[rng.random_range(0..durations.len())]);
                if subject == "CHEM" {
                    req = req.with_room_type("lab");
                }
                store = store.with_requirement("sch", req);
            }
        }
        store
    }

    #[tokio::test]
    async fn test_randomized_invariants_hold() {
        for seed in [1, 7, 42, 2024] {
            let store = Arc::new(random_store(seed));
            let out = generate(&store, GenerateOptions::default()).await;

            assert!(out.placed_count <= out.requested_count);
            assert!(find_double_bookings(&out.entries).is_empty(), "seed {seed}");

            let staff_off = store.fetch_staff_unavailability("sch").await.unwrap();
            let rooms_off = store.fetch_room_unavailability("sch").await.unwrap();
            for e in &out.entries {
                assert!(e.window.is_valid());
                assert!(e.window.start_minute >= 480 && e.window.end_minute <= 840);
                assert!(!staff_off
                    .iter()
                    .any(|u| u.resource_id == e.staff_id && u.window.overlaps(&e.window)));
                if let Some(room_id) = &e.room_id {
                    assert!(!rooms_off
                        .iter()
                        .any(|u| &u.resource_id == room_id && u.window.overlaps(&e.window)));
                }
            }

            let requirements = store.fetch_requirements("sch", None).await.unwrap();
            let mut per_requirement: HashMap<(&str, &str), u32> = HashMap::new();
            for e in &out.entries {
                *per_requirement
                    .entry((e.section_id.as_str(), e.subject_id.as_str()))
                    .or_insert(0) += 1;
            }
            for r in &requirements {
                let placed = per_requirement
                    .get(&(r.section_id.as_str(), r.subject_id.as_str()))
                    .copied()
                    .unwrap_or(0);
                assert!(placed <= r.periods_per_week);
            }
        }
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_entries() {
        let a = generate(&Arc::new(random_store(99)), GenerateOptions::default()).await;
        let b = generate(&Arc::new(random_store(99)), GenerateOptions::default()).await;
        assert_ne!(a.run_id, b.run_id);
        assert_eq!(a.entries, b.entries);
        assert_eq!(a.placed_count, b.placed_count);
    }
}
