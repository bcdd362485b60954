//! Placement and timetable entry models.
//!
//! A [`Placement`] is one occurrence of a requirement assigned to a
//! (window, teacher, room) combination by a run. Accepted placements are
//! projected into durable [`TimetableEntry`] rows that no longer refer back
//! to the run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ResourceKind, TimeWindow};

/// Score of a placement that matched every preference.
pub const FULL_SCORE: f64 = 1.0;

/// A proposed or accepted assignment of one occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Owning run.
    pub run_id: Uuid,
    /// Scheduled section.
    pub section_id: String,
    /// Scheduled subject.
    pub subject_id: String,
    /// Assigned teacher.
    pub staff_id: String,
    /// Assigned room, if the requirement asked for one.
    pub room_id: Option<String>,
    /// Assigned window.
    pub window: TimeWindow,
    /// Preference fit (1.0 = all preferences met).
    pub score: f64,
    /// Soft preference deviations. Hard constraints are never violated.
    pub violations: Vec<Violation>,
}

impl Placement {
    /// Creates a placement with full score and no violations.
    pub fn new(
        run_id: Uuid,
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        staff_id: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            run_id,
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            staff_id: staff_id.into(),
            room_id: None,
            window,
            score: FULL_SCORE,
            violations: Vec::new(),
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Records a soft violation and lowers the score accordingly.
    pub fn with_violation(mut self, violation: Violation) -> Self {
        self.score = (self.score - violation.penalty()).max(0.0);
        self.violations.push(violation);
        self
    }

    /// Durable projection of this placement.
    pub fn to_entry(&self) -> TimetableEntry {
        TimetableEntry::from(self)
    }
}

/// A published timetable row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    /// Section.
    pub section_id: String,
    /// Subject.
    pub subject_id: String,
    /// Teacher.
    pub staff_id: String,
    /// Room, if any.
    pub room_id: Option<String>,
    /// Lesson window.
    pub window: TimeWindow,
}

impl TimetableEntry {
    /// Creates an entry without a room.
    pub fn new(
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        staff_id: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            staff_id: staff_id.into(),
            room_id: None,
            window,
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }
}

impl From<&Placement> for TimetableEntry {
    fn from(p: &Placement) -> Self {
        Self {
            section_id: p.section_id.clone(),
            subject_id: p.subject_id.clone(),
            staff_id: p.staff_id.clone(),
            room_id: p.room_id.clone(),
            window: p.window,
        }
    }
}

/// A soft preference deviation recorded on a placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (room, staff member, ...).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of soft violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// A typeless room was used because no room of the preferred type was free.
    RoomTypeFallback,
    /// Domain-specific violation.
    Custom(String),
}

impl Violation {
    /// Creates a room type fallback violation.
    pub fn room_type_fallback(room_id: impl Into<String>, preferred_type: &str) -> Self {
        let room_id = room_id.into();
        Self {
            violation_type: ViolationType::RoomTypeFallback,
            message: format!("no free '{preferred_type}' room, used general room '{room_id}'"),
            entity_id: room_id,
            severity: 50,
        }
    }

    /// Score penalty for this violation (severity / 100).
    pub fn penalty(&self) -> f64 {
        f64::from(self.severity.clamp(0, 100)) / 100.0
    }
}

/// A pair of entries that book the same resource at overlapping times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBooking {
    /// Resource kind booked twice.
    pub kind: ResourceKind,
    /// Resource id booked twice.
    pub resource_id: String,
    /// Index of the first entry.
    pub first: usize,
    /// Index of the second entry.
    pub second: usize,
}

/// Finds every section, staff or room double booking among `entries`.
///
/// O(n²) pairwise check; intended for verification, not for the search.
pub fn find_double_bookings(entries: &[TimetableEntry]) -> Vec<DoubleBooking> {
    let mut out = Vec::new();
    for (i, a) in entries.iter().enumerate() {
        for (j, b) in entries.iter().enumerate().skip(i + 1) {
            if !a.window.overlaps(&b.window) {
                continue;
            }
            if a.section_id == b.section_id {
                out.push(DoubleBooking {
                    kind: ResourceKind::Section,
                    resource_id: a.section_id.clone(),
                    first: i,
                    second: j,
                });
            }
            if a.staff_id == b.staff_id {
                out.push(DoubleBooking {
                    kind: ResourceKind::Staff,
                    resource_id: a.staff_id.clone(),
                    first: i,
                    second: j,
                });
            }
            if let (Some(ra), Some(rb)) = (&a.room_id, &b.room_id) {
                if ra == rb {
                    out.push(DoubleBooking {
                        kind: ResourceKind::Room,
                        resource_id: ra.clone(),
                        first: i,
                        second: j,
                    });
                }
            }
        }
    }
    out
}
