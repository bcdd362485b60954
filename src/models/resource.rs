//! Resource model.
//!
//! Three kinds of resource can be double-booked in a timetable: class
//! sections, staff members and rooms. Each is identified by an opaque
//! string id owned by the surrounding application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a bookable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// A class section (the students attending together).
    Section,
    /// A teacher or other staff member.
    Staff,
    /// A physical room.
    Room,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Section => "section",
            ResourceKind::Staff => "staff",
            ResourceKind::Room => "room",
        };
        f.write_str(s)
    }
}

/// A reference to exactly one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceRef {
    /// A class section id.
    Section(String),
    /// A staff id.
    Staff(String),
    /// A room id.
    Room(String),
}

impl ResourceRef {
    /// The kind of resource referenced.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Section(_) => ResourceKind::Section,
            ResourceRef::Staff(_) => ResourceKind::Staff,
            ResourceRef::Room(_) => ResourceKind::Room,
        }
    }

    /// The referenced resource id.
    pub fn id(&self) -> &str {
        match self {
            ResourceRef::Section(id) | ResourceRef::Staff(id) | ResourceRef::Room(id) => id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// A room that lessons can be placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Room type (e.g. "lab", "gym"). `None` = general purpose room.
    pub room_type: Option<String>,
}

impl Room {
    /// Creates a general purpose (typeless) room.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_type: None,
        }
    }

    /// Sets the room type.
    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    /// Whether this room is of exactly the given type.
    pub fn has_type(&self, room_type: &str) -> bool {
        self.room_type.as_deref() == Some(room_type)
    }

    /// Whether this room has no type.
    pub fn is_typeless(&self) -> bool {
        self.room_type.is_none()
    }
}
