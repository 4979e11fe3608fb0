use std::future::Future;

use crate::error::BatchResult;
use crate::types::{JobExecution, JobIdentity, JobInstance, JobParameters, StepExecution};

/// Trait for stores that persist job and step execution metadata.
///
/// The repository owns id assignment: instances, job executions and step
/// executions receive their ids on creation. Updates replace the stored
/// snapshot for the given id.
pub trait JobRepository {
    /// Returns the instance for `identity`, creating it on first use.
    fn resolve_instance(
        &self,
        job_name: &str,
        identity: &JobIdentity,
    ) -> impl Future<Output = BatchResult<JobInstance>> + Send;

    /// Creates a new execution for `instance` in the created state.
    ///
    /// Enforces duplicate-run protection: when the instance already has a
    /// completed execution, the launch is rejected with
    /// [`crate::error::ErrorKind::DuplicateJob`]. The check and the creation
    /// are one atomic operation, so two concurrent launches of the same
    /// identity cannot both slip past the guard.
    fn create_job_execution(
        &self,
        instance: &JobInstance,
        parameters: JobParameters,
    ) -> impl Future<Output = BatchResult<JobExecution>> + Send;

    /// Replaces the stored snapshot of a job execution.
    fn update_job_execution(
        &self,
        execution: &JobExecution,
    ) -> impl Future<Output = BatchResult<()>> + Send;

    /// Creates a new step execution for `job_execution_id` in the created state.
    fn create_step_execution(
        &self,
        job_execution_id: u64,
        step_name: &str,
    ) -> impl Future<Output = BatchResult<StepExecution>> + Send;

    /// Replaces the stored snapshot of a step execution.
    fn update_step_execution(
        &self,
        execution: &StepExecution,
    ) -> impl Future<Output = BatchResult<()>> + Send;
}
