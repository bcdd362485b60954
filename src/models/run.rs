//! Scheduling run ledger model.
//!
//! A [`Run`] is created in [`RunStatus::Running`] before the search starts
//! and moves exactly once to a terminal state. Runs are never resumed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::options::GenerateOptions;
use crate::scheduler::RunMetrics;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Search in progress.
    Running,
    /// Search finished and its placements were materialized.
    Succeeded,
    /// Materialization failed; nothing from this run is durable.
    Failed,
}

impl RunStatus {
    /// Whether the run can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// One execution of the timetable generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Run identifier.
    pub id: Uuid,
    /// School the run belongs to.
    pub school_id: String,
    /// Current status.
    pub status: RunStatus,
    /// Options the run was started with.
    pub options: GenerateOptions,
    /// Result metrics, set when the run finishes.
    pub metrics: Option<RunMetrics>,
    /// Failure description for `Failed` runs.
    pub error: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time the run reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Run {
    /// Creates a new run in `Running` state.
    pub fn start(school_id: impl Into<String>, options: GenerateOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            school_id: school_id.into(),
            status: RunStatus::Running,
            options,
            metrics: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Marks the run succeeded.
    pub fn succeed(&mut self, metrics: RunMetrics) -> SchedulerResult<()> {
        self.finish(RunStatus::Succeeded, metrics, None)
    }

    /// Marks the run failed.
    pub fn fail(&mut self, metrics: RunMetrics, error: impl Into<String>) -> SchedulerResult<()> {
        self.finish(RunStatus::Failed, metrics, Some(error.into()))
    }

    fn finish(
        &mut self,
        status: RunStatus,
        metrics: RunMetrics,
        error: Option<String>,
    ) -> SchedulerResult<()> {
        if self.status.is_terminal() {
            return Err(SchedulerError::RunAlreadyFinished {
                run_id: self.id,
                status: self.status,
            });
        }
        self.status = status;
        self.metrics = Some(metrics);
        self.error = error;
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}

/// A school and its stored operating hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    /// School identifier.
    pub id: String,
    /// Daily opening time (`HH:MM`), if configured.
    pub start_time: Option<String>,
    /// Daily closing time (`HH:MM`), if configured.
    pub end_time: Option<String>,
}

impl School {
    /// Creates a school without operating hours.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time: None,
            end_time: None,
        }
    }

    /// Sets the operating hours.
    pub fn with_hours(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self.end_time = Some(end.into());
        self
    }
}
