use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::repository::JobRepository;
use crate::types::{
    ExitCode, JobExecution, JobIdentity, JobInstance, JobParameters, StepExecution,
};

#[derive(Debug, Default)]
struct Inner {
    instances: HashMap<JobIdentity, JobInstance>,
    executions: BTreeMap<u64, JobExecution>,
    step_executions: BTreeMap<u64, StepExecution>,
    next_instance_id: u64,
    next_execution_id: u64,
    next_step_execution_id: u64,
}

/// An in-memory [`JobRepository`].
///
/// Metadata lives for the lifetime of the process, which is enough for
/// duplicate-run protection within a single runner invocation and for
/// inspecting executions in tests. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored job executions in creation order.
    pub async fn job_executions(&self) -> Vec<JobExecution> {
        self.inner.lock().await.executions.values().cloned().collect()
    }

    /// Returns all stored step executions in creation order.
    pub async fn step_executions(&self) -> Vec<StepExecution> {
        self.inner
            .lock()
            .await
            .step_executions
            .values()
            .cloned()
            .collect()
    }
}

impl JobRepository for MemoryRepository {
    async fn resolve_instance(
        &self,
        job_name: &str,
        identity: &JobIdentity,
    ) -> BatchResult<JobInstance> {
        let mut inner = self.inner.lock().await;

        if let Some(instance) = inner.instances.get(identity) {
            return Ok(instance.clone());
        }

        inner.next_instance_id += 1;
        let instance = JobInstance {
            id: inner.next_instance_id,
            job_name: job_name.to_string(),
            identity: identity.clone(),
        };
        inner.instances.insert(identity.clone(), instance.clone());

        Ok(instance)
    }

    async fn create_job_execution(
        &self,
        instance: &JobInstance,
        parameters: JobParameters,
    ) -> BatchResult<JobExecution> {
        let mut inner = self.inner.lock().await;

        // Guard and creation happen under the same lock, so two concurrent
        // launches of one identity cannot both pass the completed check.
        let already_completed = inner.executions.values().any(|execution| {
            execution.job_instance_id == instance.id
                && execution.exit_status.code == ExitCode::Completed
        });
        if already_completed {
            bail!(
                ErrorKind::DuplicateJob,
                "A completed execution already exists for this job and parameters",
                format!("identity `{}`", instance.identity)
            );
        }

        inner.next_execution_id += 1;
        let execution = JobExecution::new(inner.next_execution_id, instance, parameters);
        inner.executions.insert(execution.id, execution.clone());

        Ok(execution)
    }

    async fn update_job_execution(&self, execution: &JobExecution) -> BatchResult<()> {
        let mut inner = self.inner.lock().await;
        inner.executions.insert(execution.id, execution.clone());

        Ok(())
    }

    async fn create_step_execution(
        &self,
        job_execution_id: u64,
        step_name: &str,
    ) -> BatchResult<StepExecution> {
        let mut inner = self.inner.lock().await;

        inner.next_step_execution_id += 1;
        let execution =
            StepExecution::new(inner.next_step_execution_id, job_execution_id, step_name);
        inner
            .step_executions
            .insert(execution.id, execution.clone());

        Ok(execution)
    }

    async fn update_step_execution(&self, execution: &StepExecution) -> BatchResult<()> {
        let mut inner = self.inner.lock().await;
        inner.step_executions.insert(execution.id, execution.clone());

        Ok(())
    }
}
