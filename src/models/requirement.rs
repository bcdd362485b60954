//! Weekly teaching requirement model.
//!
//! A requirement states that a class section needs `periods_per_week`
//! lessons of a subject, each `duration_minutes` long. Each of those
//! lessons is one *occurrence* placed independently by the search.

use serde::{Deserialize, Serialize};

/// One (section, subject) pair needing scheduling.
///
/// Immutable input to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Class section to teach.
    pub section_id: String,
    /// Subject to teach.
    pub subject_id: String,
    /// Class (grade) owning the section; used to resolve eligible teachers.
    pub class_id: String,
    /// Number of lessons per week (>= 1).
    pub periods_per_week: u32,
    /// Length of each lesson in minutes (> 0).
    pub duration_minutes: u32,
    /// Preferred room type. `None` = no room is booked.
    pub preferred_room_type: Option<String>,
}

impl Requirement {
    /// Creates a requirement of one 60 minute lesson per week.
    pub fn new(
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            class_id: class_id.into(),
            periods_per_week: 1,
            duration_minutes: 60,
            preferred_room_type: None,
        }
    }

    /// Sets the weekly period count.
    pub fn with_periods(mut self, periods_per_week: u32) -> Self {
        self.periods_per_week = periods_per_week;
        self
    }

    /// Sets the lesson duration.
    pub fn with_duration(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    /// Sets the preferred room type.
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.preferred_room_type = Some(room_type.into());
        self
    }
}

/// A staff member's qualification to teach a subject.
///
/// `class_id = None` is a wildcard: the staff member may teach the subject
/// to any class that has no class-specific qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherQualification {
    /// Qualified staff member.
    pub staff_id: String,
    /// Subject taught.
    pub subject_id: String,
    /// Class restriction. `None` = any class.
    pub class_id: Option<String>,
}

impl TeacherQualification {
    /// Qualification for one specific class.
    pub fn for_class(
        staff_id: impl Into<String>,
        subject_id: impl Into<String>,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            staff_id: staff_id.into(),
            subject_id: subject_id.into(),
            class_id: Some(class_id.into()),
        }
    }

    /// Qualification for every class.
    pub fn any_class(staff_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            staff_id: staff_id.into(),
            subject_id: subject_id.into(),
            class_id: None,
        }
    }
}
