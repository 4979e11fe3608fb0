use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::JobParameters;

/// Lifecycle status of a job or step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Execution metadata exists but processing has not begun.
    Created,
    /// Processing is in progress.
    Started,
    /// Processing finished successfully.
    Completed,
    /// Processing finished with a failure.
    Failed,
    /// Processing was stopped before the source was exhausted.
    Stopped,
}

impl BatchStatus {
    /// Returns whether this status is terminal.
    ///
    /// Terminal executions are immutable; their end time and final counts are
    /// fixed at the transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed | BatchStatus::Failed | BatchStatus::Stopped
        )
    }
}

/// Enumerated outcome of a job or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitCode {
    /// All work finished successfully.
    Completed,
    /// Work finished with a failure.
    Failed,
    /// Work was stopped before completion.
    Stopped,
    /// No outcome has been recorded yet.
    Unknown,
}

impl ExitCode {
    /// Returns the string code reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitCode::Completed => "COMPLETED",
            ExitCode::Failed => "FAILED",
            ExitCode::Stopped => "STOPPED",
            ExitCode::Unknown => "UNKNOWN",
        }
    }

    /// Returns the aggregation precedence of this code.
    ///
    /// Higher precedence dominates when statuses are combined: `FAILED` over
    /// `STOPPED` over `UNKNOWN` over `COMPLETED`.
    fn precedence(&self) -> u8 {
        match self {
            ExitCode::Completed => 0,
            ExitCode::Unknown => 1,
            ExitCode::Stopped => 2,
            ExitCode::Failed => 3,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome classification plus an optional free-text description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// The enumerated outcome.
    pub code: ExitCode,
    /// Optional human-readable description, typically the causing error.
    pub description: Option<String>,
}

impl ExitStatus {
    /// Returns a `COMPLETED` exit status.
    pub fn completed() -> Self {
        Self {
            code: ExitCode::Completed,
            description: None,
        }
    }

    /// Returns a `FAILED` exit status carrying the causing error description.
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Failed,
            description: Some(description.into()),
        }
    }

    /// Returns a `STOPPED` exit status.
    pub fn stopped() -> Self {
        Self {
            code: ExitCode::Stopped,
            description: None,
        }
    }

    /// Returns an `UNKNOWN` exit status.
    pub fn unknown() -> Self {
        Self {
            code: ExitCode::Unknown,
            description: None,
        }
    }

    /// Combines two exit statuses by worst-outcome precedence.
    pub fn and(self, other: ExitStatus) -> ExitStatus {
        if other.code.precedence() > self.code.precedence() {
            other
        } else {
            self
        }
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Deterministic identity of a logical job run.
///
/// Derived from the job name and the parameter values; two launches with the
/// same name and identical parameters resolve to the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobIdentity(String);

impl JobIdentity {
    /// Derives the identity for a job name and parameter set.
    pub fn new(job_name: &str, parameters: &JobParameters) -> Self {
        Self(format!("{job_name}[{}]", parameters.identity_fragment()))
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical job run, identified by job name plus parameter identity.
///
/// Created on the first launch with a given identity and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInstance {
    /// Repository-assigned instance id.
    pub id: u64,
    /// Name of the job.
    pub job_name: String,
    /// Identity derived from the job name and parameters.
    pub identity: JobIdentity,
}

/// One attempt to run a [`JobInstance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExecution {
    /// Repository-assigned execution id.
    pub id: u64,
    /// Id of the instance this execution belongs to.
    pub job_instance_id: u64,
    /// Name of the job.
    pub job_name: String,
    /// Parameters this execution was launched with.
    pub parameters: JobParameters,
    /// Lifecycle status.
    pub status: BatchStatus,
    /// Aggregated outcome, `UNKNOWN` until the execution finishes.
    pub exit_status: ExitStatus,
    /// Time the execution started, if it started.
    pub start_time: Option<DateTime<Utc>>,
    /// Time the execution finished, if it finished.
    pub end_time: Option<DateTime<Utc>>,
    /// Step executions in the order the steps ran.
    pub step_executions: Vec<StepExecution>,
}

impl JobExecution {
    /// Creates execution metadata in the `Created` state.
    pub fn new(id: u64, instance: &JobInstance, parameters: JobParameters) -> Self {
        Self {
            id,
            job_instance_id: instance.id,
            job_name: instance.job_name.clone(),
            parameters,
            status: BatchStatus::Created,
            exit_status: ExitStatus::unknown(),
            start_time: None,
            end_time: None,
            step_executions: Vec::new(),
        }
    }

    /// Transitions the execution to `Started` and stamps the start time.
    pub fn mark_started(&mut self) {
        self.status = BatchStatus::Started;
        self.start_time = Some(Utc::now());
    }

    /// Finalizes the execution with a terminal status and exit status.
    pub fn mark_finished(&mut self, status: BatchStatus, exit_status: ExitStatus) {
        debug_assert!(status.is_terminal());

        self.status = status;
        self.exit_status = exit_status;
        self.end_time = Some(Utc::now());
    }
}

/// One attempt to run a step within a [`JobExecution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExecution {
    /// Repository-assigned execution id.
    pub id: u64,
    /// Id of the owning job execution.
    pub job_execution_id: u64,
    /// Name of the step.
    pub step_name: String,
    /// Lifecycle status.
    pub status: BatchStatus,
    /// Outcome of the step, `UNKNOWN` until the step finishes.
    pub exit_status: ExitStatus,
    /// Number of records read from the source.
    pub read_count: u64,
    /// Number of records written to the sink.
    pub write_count: u64,
    /// Number of chunk transactions committed.
    pub commit_count: u64,
    /// Time the step started, if it started.
    pub start_time: Option<DateTime<Utc>>,
    /// Time the step finished, if it finished.
    pub end_time: Option<DateTime<Utc>>,
}

impl StepExecution {
    /// Creates step execution metadata in the `Created` state.
    pub fn new(id: u64, job_execution_id: u64, step_name: impl Into<String>) -> Self {
        Self {
            id,
            job_execution_id,
            step_name: step_name.into(),
            status: BatchStatus::Created,
            exit_status: ExitStatus::unknown(),
            read_count: 0,
            write_count: 0,
            commit_count: 0,
            start_time: None,
            end_time: None,
        }
    }

    /// Transitions the step to `Started` and stamps the start time.
    pub fn mark_started(&mut self) {
        self.status = BatchStatus::Started;
        self.start_time = Some(Utc::now());
    }

    /// Finalizes the step with a terminal status and exit status.
    pub fn mark_finished(&mut self, status: BatchStatus, exit_status: ExitStatus) {
        debug_assert!(status.is_terminal());

        self.status = status;
        self.exit_status = exit_status;
        self.end_time = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_aggregates_by_worst_outcome() {
        let completed = ExitStatus::completed();
        let failed = ExitStatus::failed("sink rejected chunk");

        let combined = completed.clone().and(failed.clone());
        assert_eq!(combined.code, ExitCode::Failed);

        let combined = failed.and(ExitStatus::stopped());
        assert_eq!(combined.code, ExitCode::Failed);

        let combined = ExitStatus::stopped().and(completed);
        assert_eq!(combined.code, ExitCode::Stopped);
    }

    #[test]
    fn identity_depends_on_name_and_parameters() {
        let parameters = JobParameters::builder().add_long("time", 42).build();

        let first = JobIdentity::new("person-data-job", &parameters);
        let second = JobIdentity::new("person-data-job", &parameters);
        let other_job = JobIdentity::new("other-job", &parameters);

        assert_eq!(first, second);
        assert_ne!(first, other_job);
    }

    #[test]
    fn terminal_transitions_fix_end_time() {
        let instance = JobInstance {
            id: 1,
            job_name: "job".to_string(),
            identity: JobIdentity::new("job", &JobParameters::default()),
        };
        let mut execution = JobExecution::new(1, &instance, JobParameters::default());

        assert_eq!(execution.status, BatchStatus::Created);
        execution.mark_started();
        assert!(execution.start_time.is_some());

        execution.mark_finished(BatchStatus::Completed, ExitStatus::completed());
        assert!(execution.status.is_terminal());
        assert!(execution.end_time.is_some());
    }
}
