//! Seeded (immovable) constraints.
//!
//! Before a search starts, every already-published entry, pinned slot and
//! unavailability window is reduced to a list of [`SeededConstraint`]s,
//! each binding one time window to exactly one resource. They are read
//! during the run and never changed.

use serde::{Deserialize, Serialize};

use super::{ResourceRef, TimeWindow, TimetableEntry};

/// Where a seeded constraint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintSource {
    /// An entry already present in the published timetable.
    PublishedEntry,
    /// A slot fixed by an administrator.
    PinnedSlot,
    /// A staff member declared unavailable.
    StaffUnavailable,
    /// A room declared unavailable.
    RoomUnavailable,
}

/// A time window reserved for one resource before search begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededConstraint {
    /// The reserved resource.
    pub resource: ResourceRef,
    /// The reserved window.
    pub window: TimeWindow,
    /// Origin of the reservation.
    pub source: ConstraintSource,
}

impl SeededConstraint {
    /// Creates a seeded constraint.
    pub fn new(resource: ResourceRef, window: TimeWindow, source: ConstraintSource) -> Self {
        Self {
            resource,
            window,
            source,
        }
    }

    /// Constraints for a published entry: section, staff and (if any) room.
    pub fn from_entry(entry: &TimetableEntry) -> Vec<Self> {
        let mut out = vec![
            Self::new(
                ResourceRef::Section(entry.section_id.clone()),
                entry.window,
                ConstraintSource::PublishedEntry,
            ),
            Self::new(
                ResourceRef::Staff(entry.staff_id.clone()),
                entry.window,
                ConstraintSource::PublishedEntry,
            ),
        ];
        if let Some(room_id) = &entry.room_id {
            out.push(Self::new(
                ResourceRef::Room(room_id.clone()),
                entry.window,
                ConstraintSource::PublishedEntry,
            ));
        }
        out
    }
}

/// A lesson slot fixed in advance.
///
/// Reserves the section plus whichever staff member and room it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedSlot {
    /// Pinned section.
    pub section_id: String,
    /// Subject taught in the slot.
    pub subject_id: String,
    /// Staff member, if fixed.
    pub staff_id: Option<String>,
    /// Room, if fixed.
    pub room_id: Option<String>,
    /// Fixed window.
    pub window: TimeWindow,
}

impl PinnedSlot {
    /// Creates a pinned slot for a section only.
    pub fn new(
        section_id: impl Into<String>,
        subject_id: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
            staff_id: None,
            room_id: None,
            window,
        }
    }

    /// Sets the pinned staff member.
    pub fn with_staff(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_id = Some(staff_id.into());
        self
    }

    /// Sets the pinned room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// One constraint per resource named by the slot.
    pub fn constraints(&self) -> Vec<SeededConstraint> {
        let mut out = vec![SeededConstraint::new(
            ResourceRef::Section(self.section_id.clone()),
            self.window,
            ConstraintSource::PinnedSlot,
        )];
        if let Some(staff_id) = &self.staff_id {
            out.push(SeededConstraint::new(
                ResourceRef::Staff(staff_id.clone()),
                self.window,
                ConstraintSource::PinnedSlot,
            ));
        }
        if let Some(room_id) = &self.room_id {
            out.push(SeededConstraint::new(
                ResourceRef::Room(room_id.clone()),
                self.window,
                ConstraintSource::PinnedSlot,
            ));
        }
        out
    }
}

/// A declared unavailability of a single staff member or room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailabilityWindow {
    /// Staff id or room id, depending on which list it was fetched from.
    pub resource_id: String,
    /// Unavailable window.
    pub window: TimeWindow,
}

impl UnavailabilityWindow {
    /// Creates an unavailability window.
    pub fn new(resource_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            resource_id: resource_id.into(),
            window,
        }
    }

    /// Constraint against a staff member.
    pub fn for_staff(&self) -> SeededConstraint {
        SeededConstraint::new(
            ResourceRef::Staff(self.resource_id.clone()),
            self.window,
            ConstraintSource::StaffUnavailable,
        )
    }

    /// Constraint against a room.
    pub fn for_room(&self) -> SeededConstraint {
        SeededConstraint::new(
            ResourceRef::Room(self.resource_id.clone()),
            self.window,
            ConstraintSource::RoomUnavailable,
        )
    }
}
