//! Input validation for timetable generation.
//!
//! Checks the rows read from the store before they reach the search.
//! Detects:
//! - Requirements with zero weekly periods or zero duration
//! - Duplicate (section, subject) requirements
//! - Requirements with empty ids
//! - Seeded windows outside Monday..Friday or with `start >= end`
//!
//! Every problem is reported, not just the first. Each error carries the
//! index of the offending row so callers can drop exactly those rows.

use crate::models::{Requirement, SeededConstraint};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Index of the offending row in the validated slice.
    pub index: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `periods_per_week` is zero.
    InvalidPeriodCount,
    /// `duration_minutes` is zero.
    InvalidDuration,
    /// The same (section, subject) pair appears twice.
    DuplicateRequirement,
    /// A section, subject or class id is empty.
    MissingId,
    /// A window is outside the teaching week or not `start < end`.
    InvalidWindow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, index: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            index: Some(index),
            message: message.into(),
        }
    }
}

/// Validates requirement rows.
///
/// Checks:
/// 1. `periods_per_week >= 1`
/// 2. `duration_minutes > 0`
/// 3. Section, subject and class ids are non-empty
/// 4. No duplicate (section, subject) pair among rows passing 1-3; the
///    later row is reported
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_requirements(requirements: &[Requirement]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, r) in requirements.iter().enumerate() {
        let reported = errors.len();

        if r.section_id.is_empty() || r.subject_id.is_empty() || r.class_id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingId,
                i,
                format!("Requirement #{i} has an empty section, subject or class id"),
            ));
        }

        if r.periods_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriodCount,
                i,
                format!(
                    "Requirement {}/{} has zero periods per week",
                    r.section_id, r.subject_id
                ),
            ));
        }

        if r.duration_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                i,
                format!(
                    "Requirement {}/{} has zero duration",
                    r.section_id, r.subject_id
                ),
            ));
        }

        // Only a row that is otherwise valid claims its (section, subject).
        if errors.len() > reported {
            continue;
        }
        if !seen.insert((r.section_id.as_str(), r.subject_id.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRequirement,
                i,
                format!(
                    "Duplicate requirement for section '{}' subject '{}'",
                    r.section_id, r.subject_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates seeded constraint windows.
pub fn validate_windows(constraints: &[SeededConstraint]) -> ValidationResult {
    let errors: Vec<ValidationError> = constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.window.is_valid())
        .map(|(i, c)| {
            ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                i,
                format!("{:?} constraint on {} has invalid window {:?}", c.source, c.resource, c.window),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
