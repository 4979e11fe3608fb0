use async_trait::async_trait;
use tracing::info;

use batch::error::BatchResult;
use batch::listener::{ChunkListener, JobListener, StepListener};
use batch::types::{JobExecution, StepExecution};

/// Logs job boundaries and the final exit code.
#[derive(Debug, Default)]
pub struct LoggingJobListener;

#[async_trait]
impl JobListener for LoggingJobListener {
    async fn before_job(&self, execution: &JobExecution) -> BatchResult<()> {
        info!(job = %execution.job_name, "job starting");

        Ok(())
    }

    async fn after_job(&self, execution: &JobExecution) -> BatchResult<()> {
        info!(
            job = %execution.job_name,
            exit_code = execution.exit_status.code.as_str(),
            "job ended"
        );

        Ok(())
    }
}

/// Logs step boundaries with their final counters.
#[derive(Debug, Default)]
pub struct LoggingStepListener;

#[async_trait]
impl StepListener for LoggingStepListener {
    async fn before_step(&self, execution: &StepExecution) -> BatchResult<()> {
        info!(step = %execution.step_name, "step starting");

        Ok(())
    }

    async fn after_step(&self, execution: &StepExecution) -> BatchResult<()> {
        info!(
            step = %execution.step_name,
            exit_code = execution.exit_status.code.as_str(),
            read_count = execution.read_count,
            write_count = execution.write_count,
            commit_count = execution.commit_count,
            "step ended"
        );

        Ok(())
    }
}

/// Logs the running counters after every committed chunk.
#[derive(Debug, Default)]
pub struct LoggingChunkListener;

#[async_trait]
impl ChunkListener for LoggingChunkListener {
    async fn after_chunk(&self, execution: &StepExecution) -> BatchResult<()> {
        info!(
            step = %execution.step_name,
            read_count = execution.read_count,
            write_count = execution.write_count,
            "chunk committed"
        );

        Ok(())
    }
}
