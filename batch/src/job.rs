//! Job definition and launching.

use tracing::info;

use crate::error::BatchResult;
use crate::listener::Listeners;
use crate::repository::JobRepository;
use crate::signal::{create_stop_channel, StopTx};
use crate::step::StepRunner;
use crate::types::{BatchStatus, ExitStatus, JobExecution, JobIdentity, JobParameters};

/// A named, ordered sequence of steps.
pub struct Job<R>
where
    R: JobRepository + Sync,
{
    name: String,
    steps: Vec<Box<dyn StepRunner<R>>>,
}

impl<R> Job<R>
where
    R: JobRepository + Sync,
{
    /// Creates a job with no steps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step to the end of the sequence.
    pub fn add_step(mut self, step: impl StepRunner<R> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Returns the name of the job.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Launches jobs and owns their execution metadata lifecycle.
///
/// The executor resolves the launch identity, enforces duplicate-run
/// protection, runs steps in order and aggregates their outcomes into the
/// job execution.
pub struct JobExecutor<R>
where
    R: JobRepository + Sync,
{
    repository: R,
    listeners: Listeners,
    stop_tx: StopTx,
}

impl<R> JobExecutor<R>
where
    R: JobRepository + Sync,
{
    /// Creates an executor over the given repository and listeners.
    pub fn new(repository: R, listeners: Listeners) -> Self {
        let (stop_tx, _) = create_stop_channel();

        Self {
            repository,
            listeners,
            stop_tx,
        }
    }

    /// Returns a handle that requests a graceful stop of running jobs.
    pub fn stop_handle(&self) -> StopTx {
        self.stop_tx.clone()
    }

    /// Launches `job` with `parameters` and drives it to a terminal status.
    ///
    /// A launch whose identity already has a completed execution is rejected
    /// with [`crate::error::ErrorKind::DuplicateJob`]; the repository checks
    /// and creates the execution atomically, so no metadata is left behind.
    /// Step failures do not surface as `Err`; they are reflected in the
    /// returned execution's status and exit status.
    pub async fn launch(
        &self,
        mut job: Job<R>,
        parameters: JobParameters,
    ) -> BatchResult<JobExecution> {
        let identity = JobIdentity::new(job.name(), &parameters);
        info!(job = %job.name(), identity = %identity, "launching job");

        let instance = self
            .repository
            .resolve_instance(job.name(), &identity)
            .await?;

        let mut execution = self
            .repository
            .create_job_execution(&instance, parameters)
            .await?;
        execution.mark_started();
        self.repository.update_job_execution(&execution).await?;
        self.listeners.notify_before_job(&execution).await;

        let mut status = BatchStatus::Completed;
        let mut exit_status = ExitStatus::completed();

        for step in job.steps.iter_mut() {
            let mut step_execution = self
                .repository
                .create_step_execution(execution.id, step.name())
                .await?;

            step.run(
                &mut step_execution,
                &self.repository,
                &self.listeners,
                self.stop_tx.subscribe(),
            )
            .await?;

            let step_status = step_execution.status;
            exit_status = exit_status.and(step_execution.exit_status.clone());
            execution.step_executions.push(step_execution);

            // A failed or stopped step halts the job; later steps never start.
            match step_status {
                BatchStatus::Failed => {
                    status = BatchStatus::Failed;
                    break;
                }
                BatchStatus::Stopped => {
                    status = BatchStatus::Stopped;
                    break;
                }
                _ => {}
            }
        }

        execution.mark_finished(status, exit_status);
        self.repository.update_job_execution(&execution).await?;
        self.listeners.notify_after_job(&execution).await;

        info!(
            job = %execution.job_name,
            exit_code = execution.exit_status.code.as_str(),
            "job finished"
        );

        Ok(execution)
    }
}
