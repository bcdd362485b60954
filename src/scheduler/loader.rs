//! Requirement loading and eligible teacher resolution.
//!
//! Requirements come annotated with their section's class id, which is
//! what the teacher qualification relation is keyed on. Requirements with
//! no eligible teacher are kept; the search simply skips them.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::SchedulerResult;
use crate::models::{Requirement, Room, TeacherQualification};
use crate::options::GenerateOptions;
use crate::store::TimetableStore;
use crate::validation::validate_requirements;

/// Eligible teachers per (subject, class).
///
/// Class-specific qualifications take precedence; wildcard ("any class")
/// qualifications are used only when a (subject, class) pair has none.
/// Teacher order is the order the qualifications were supplied in, with
/// duplicates removed.
#[derive(Debug, Clone, Default)]
pub struct EligibleTeachers {
    by_class: HashMap<(String, String), Vec<String>>,
    any_class: HashMap<String, Vec<String>>,
}

impl EligibleTeachers {
    /// Builds the resolver from a qualification list.
    pub fn from_qualifications(qualifications: &[TeacherQualification]) -> Self {
        let mut out = Self::default();
        for q in qualifications {
            let list = match &q.class_id {
                Some(class_id) => out
                    .by_class
                    .entry((q.subject_id.clone(), class_id.clone()))
                    .or_default(),
                None => out.any_class.entry(q.subject_id.clone()).or_default(),
            };
            if !list.contains(&q.staff_id) {
                list.push(q.staff_id.clone());
            }
        }
        out
    }

    /// Staff ids eligible to teach `subject_id` to `class_id`, in stable order.
    pub fn resolve(&self, subject_id: &str, class_id: &str) -> &[String] {
        if let Some(list) = self
            .by_class
            .get(&(subject_id.to_string(), class_id.to_string()))
        {
            return list;
        }
        self.any_class
            .get(subject_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Everything the search needs besides the seeded occupancy.
#[derive(Debug, Clone, Default)]
pub struct LoadedRequirements {
    /// Valid requirements, in store order.
    pub requirements: Vec<Requirement>,
    /// Eligible teacher resolver.
    pub teachers: EligibleTeachers,
    /// Rooms of the school, in store order.
    pub rooms: Vec<Room>,
    /// Requirements dropped by input validation.
    pub rejected: usize,
}

impl LoadedRequirements {
    /// Total occurrences requested (sum of `periods_per_week`).
    pub fn requested_occurrences(&self) -> usize {
        self.requirements
            .iter()
            .map(|r| r.periods_per_week as usize)
            .sum()
    }
}

/// Reads requirements, teacher qualifications and rooms from the store.
pub struct RequirementLoader;

impl RequirementLoader {
    /// Loads the inputs of a run.
    ///
    /// The three reads are issued concurrently. Invalid requirement rows
    /// are dropped with a warning.
    pub async fn load(
        store: &dyn TimetableStore,
        school_id: &str,
        options: &GenerateOptions,
    ) -> SchedulerResult<LoadedRequirements> {
        let (requirements, qualifications, rooms) = tokio::try_join!(
            store.fetch_requirements(school_id, options.target_section_ids.as_deref()),
            store.fetch_teacher_qualifications(school_id),
            store.fetch_rooms(school_id),
        )?;

        let fetched = requirements.len();
        let requirements = match validate_requirements(&requirements) {
            Ok(()) => requirements,
            Err(errors) => {
                for e in &errors {
                    warn!(school_id, kind = ?e.kind, "{}", e.message);
                }
                requirements
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| !errors.iter().any(|e| e.index == Some(*i)))
                    .map(|(_, r)| r)
                    .collect()
            }
        };
        let rejected = fetched - requirements.len();

        debug!(
            school_id,
            requirements = requirements.len(),
            rejected,
            qualifications = qualifications.len(),
            rooms = rooms.len(),
            "loaded requirements"
        );

        Ok(LoadedRequirements {
            requirements,
            teachers: EligibleTeachers::from_qualifications(&qualifications),
            rooms,
            rejected,
        })
    }
}
