//! Lifecycle listeners for jobs, steps and chunks.
//!
//! Listeners observe execution boundaries; they never influence control flow.
//! A listener returning an error is logged and skipped, and the remaining
//! listeners still run in registration order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::BatchResult;
use crate::types::{JobExecution, StepExecution};

/// Observes job execution boundaries.
#[async_trait]
pub trait JobListener: Send + Sync {
    /// Called after the execution transitions to started, before any step runs.
    async fn before_job(&self, _execution: &JobExecution) -> BatchResult<()> {
        Ok(())
    }

    /// Called after the execution reaches a terminal status.
    async fn after_job(&self, _execution: &JobExecution) -> BatchResult<()> {
        Ok(())
    }
}

/// Observes step execution boundaries.
#[async_trait]
pub trait StepListener: Send + Sync {
    /// Called after the step transitions to started, before the first chunk.
    async fn before_step(&self, _execution: &StepExecution) -> BatchResult<()> {
        Ok(())
    }

    /// Called after the step reaches a terminal status.
    async fn after_step(&self, _execution: &StepExecution) -> BatchResult<()> {
        Ok(())
    }
}

/// Observes chunk commits within a step.
#[async_trait]
pub trait ChunkListener: Send + Sync {
    /// Called after each chunk commit, with the step counters already updated.
    async fn after_chunk(&self, _execution: &StepExecution) -> BatchResult<()> {
        Ok(())
    }
}

/// Ordered listener registrations shared by a job and its steps.
#[derive(Clone, Default)]
pub struct Listeners {
    job: Vec<Arc<dyn JobListener>>,
    step: Vec<Arc<dyn StepListener>>,
    chunk: Vec<Arc<dyn ChunkListener>>,
}

impl Listeners {
    /// Creates an empty listener set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job listener at the end of the notification order.
    pub fn with_job_listener(mut self, listener: Arc<dyn JobListener>) -> Self {
        self.job.push(listener);
        self
    }

    /// Registers a step listener at the end of the notification order.
    pub fn with_step_listener(mut self, listener: Arc<dyn StepListener>) -> Self {
        self.step.push(listener);
        self
    }

    /// Registers a chunk listener at the end of the notification order.
    pub fn with_chunk_listener(mut self, listener: Arc<dyn ChunkListener>) -> Self {
        self.chunk.push(listener);
        self
    }

    pub(crate) async fn notify_before_job(&self, execution: &JobExecution) {
        for listener in &self.job {
            if let Err(err) = listener.before_job(execution).await {
                warn!(error = %err, "job listener failed in before_job");
            }
        }
    }

    pub(crate) async fn notify_after_job(&self, execution: &JobExecution) {
        for listener in &self.job {
            if let Err(err) = listener.after_job(execution).await {
                warn!(error = %err, "job listener failed in after_job");
            }
        }
    }

    pub(crate) async fn notify_before_step(&self, execution: &StepExecution) {
        for listener in &self.step {
            if let Err(err) = listener.before_step(execution).await {
                warn!(error = %err, "step listener failed in before_step");
            }
        }
    }

    pub(crate) async fn notify_after_step(&self, execution: &StepExecution) {
        for listener in &self.step {
            if let Err(err) = listener.after_step(execution).await {
                warn!(error = %err, "step listener failed in after_step");
            }
        }
    }

    pub(crate) async fn notify_after_chunk(&self, execution: &StepExecution) {
        for listener in &self.chunk {
            if let Err(err) = listener.after_chunk(execution).await {
                warn!(error = %err, "chunk listener failed in after_chunk");
            }
        }
    }
}
