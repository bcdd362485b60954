//! Error types.
//!
//! Only preconditions and persistence failures are errors. A requirement
//! without eligible teachers, or an occurrence that fits nowhere, is
//! skipped and shows up as `placed_count < requested_count` instead.

use thiserror::Error;
use uuid::Uuid;

use crate::models::RunStatus;

/// Errors reported by store adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A transaction was rolled back.
    #[error("transaction aborted: {0}")]
    TransactionAborted(String),
    /// A record the operation needs does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
}

/// Errors reported by the timetable generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// No school with this id exists in the store.
    #[error("school not found: id={school_id}")]
    SchoolNotFound { school_id: String },
    /// Neither the school nor the options give both opening and closing times.
    #[error("operating hours not configured for school {school_id}")]
    OperatingHoursMissing { school_id: String },
    /// A time of day is not valid `HH:MM`.
    #[error("invalid time of day '{value}', expected HH:MM")]
    InvalidTime { value: String },
    /// Closing time is not after opening time.
    #[error("invalid operating hours {start}-{end}: end must be after start")]
    InvalidOperatingHours { start: String, end: String },
    /// A finished run was asked to change status again.
    #[error("run {run_id} already finished with status {status:?}")]
    RunAlreadyFinished { run_id: Uuid, status: RunStatus },
    /// The run's placements and entries could not be committed; nothing
    /// from the run is durable.
    #[error("failed to persist results of run {run_id}: {source}")]
    Persistence {
        run_id: Uuid,
        #[source]
        source: StoreError,
    },
    /// A store read or ledger write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl SchedulerError {
    /// Creates a [`SchedulerError::InvalidTime`] for `value`.
    pub fn invalid_time<S: Into<String>>(value: S) -> Self {
        Self::InvalidTime {
            value: value.into(),
        }
    }

    /// Precondition failures: the run was aborted before any placement.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SchedulerError::SchoolNotFound { .. }
                | SchedulerError::OperatingHoursMissing { .. }
                | SchedulerError::InvalidTime { .. }
                | SchedulerError::InvalidOperatingHours { .. }
        )
    }

    /// Store failures that may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SchedulerError::Store(StoreError::Unavailable(_))
                | SchedulerError::Persistence { .. }
        )
    }
}
