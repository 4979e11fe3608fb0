//! Chunk-oriented step execution.
//!
//! A step drives records from one source into one sink in chunk-sized
//! transactions. Chunk accumulation is serial, since the source has a single
//! cursor, while chunk commits are dispatched to background tasks with a
//! configurable bound on how many may be in flight at once. All counter
//! updates and failure decisions happen in the driving loop, so the step
//! execution is never mutated concurrently.

use async_trait::async_trait;
use tracing::{debug, info};

use batch_config::shared::ChunkConfig;

use crate::chunk::{ChunkProcessor, ChunkResult};
use crate::dispatcher::TaskDispatcher;
use crate::error::{BatchError, BatchResult};
use crate::listener::Listeners;
use crate::repository::JobRepository;
use crate::signal::StopRx;
use crate::sink::RecordSink;
use crate::source::RecordSource;
use crate::types::{BatchStatus, ExitStatus, StepExecution};

/// A step of a job, runnable against a repository.
///
/// The trait erases the source and sink types so a job can hold
/// heterogeneous steps.
#[async_trait]
pub trait StepRunner<R>: Send
where
    R: JobRepository + Sync,
{
    /// Returns the name of the step.
    fn name(&self) -> &str;

    /// Runs the step to a terminal status.
    ///
    /// Processing failures are recorded in `execution` and do not surface as
    /// an `Err`; only infrastructure failures, like the repository being
    /// unavailable, abort the run itself.
    async fn run(
        &mut self,
        execution: &mut StepExecution,
        repository: &R,
        listeners: &Listeners,
        stop_rx: StopRx,
    ) -> BatchResult<()>;
}

/// A chunk-oriented step moving records from a source to a sink.
#[derive(Debug)]
pub struct Step<S, K>
where
    K: RecordSink + Clone + Send + Sync + 'static,
{
    name: String,
    source: S,
    processor: ChunkProcessor<K>,
    max_in_flight: usize,
}

impl<S, K> Step<S, K>
where
    S: RecordSource + Send,
    K: RecordSink + Clone + Send + Sync + 'static,
{
    /// Creates a step with the given chunking configuration.
    pub fn new(name: impl Into<String>, source: S, sink: K, chunk: &ChunkConfig) -> Self {
        Self {
            name: name.into(),
            source,
            processor: ChunkProcessor::new(sink, chunk.chunk_size),
            max_in_flight: chunk.max_in_flight_chunks,
        }
    }

    /// Drives chunks from the source into the sink until exhaustion, failure
    /// or a stop request.
    ///
    /// Returns the errors collected from chunk processing; an empty vector
    /// means every chunk committed.
    async fn drive<R>(
        &mut self,
        execution: &mut StepExecution,
        repository: &R,
        listeners: &Listeners,
        stop_rx: &StopRx,
        stopped: &mut bool,
    ) -> BatchResult<Vec<BatchError>>
    where
        R: JobRepository + Sync,
    {
        let mut dispatcher = TaskDispatcher::new();
        let mut errors = Vec::new();
        let mut next_index = 0;

        if let Err(err) = self.source.open().await {
            errors.push(err);
        }

        while errors.is_empty() {
            // Stop requests take effect between chunks only.
            if stop_rx.is_stopped() {
                *stopped = true;
                break;
            }

            let chunk = match self.processor.accumulate(&mut self.source, next_index).await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    errors.push(err);
                    break;
                }
            };
            next_index += 1;
            let last = chunk.last;

            // Bound in-flight commits before submitting more work.
            while dispatcher.in_flight() >= self.max_in_flight {
                if let Some(result) = dispatcher.join_next().await {
                    apply_chunk_result(execution, repository, listeners, result, &mut errors)
                        .await?;
                }
            }

            // After a failure no new chunk begins; the accumulated one is
            // discarded, since its transaction never opened.
            if !errors.is_empty() {
                break;
            }

            dispatcher.submit(self.processor.commit(chunk));

            if last {
                break;
            }
        }

        // In-flight chunks run to completion and their counts are kept, even
        // when the step is already failing or stopping.
        for result in dispatcher.drain().await {
            apply_chunk_result(execution, repository, listeners, result, &mut errors).await?;
        }

        Ok(errors)
    }
}

#[async_trait]
impl<S, K, R> StepRunner<R> for Step<S, K>
where
    S: RecordSource + Send,
    K: RecordSink + Clone + Send + Sync + 'static,
    R: JobRepository + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &mut self,
        execution: &mut StepExecution,
        repository: &R,
        listeners: &Listeners,
        stop_rx: StopRx,
    ) -> BatchResult<()> {
        info!(step = %self.name, "starting step");

        execution.mark_started();
        repository.update_step_execution(execution).await?;
        listeners.notify_before_step(execution).await;

        let mut stopped = false;
        let errors = self
            .drive(execution, repository, listeners, &stop_rx, &mut stopped)
            .await?;

        let (status, exit_status) = if !errors.is_empty() {
            let err = BatchError::from(errors);
            (BatchStatus::Failed, ExitStatus::failed(err.to_string()))
        } else if stopped {
            (BatchStatus::Stopped, ExitStatus::stopped())
        } else {
            (BatchStatus::Completed, ExitStatus::completed())
        };

        execution.mark_finished(status, exit_status);
        repository.update_step_execution(execution).await?;
        listeners.notify_after_step(execution).await;

        info!(
            step = %self.name,
            exit_code = execution.exit_status.code.as_str(),
            read_count = execution.read_count,
            write_count = execution.write_count,
            commit_count = execution.commit_count,
            "step finished"
        );

        Ok(())
    }
}

/// Folds one resolved chunk into the step execution.
///
/// Successful chunks update the counters, persist the snapshot and notify
/// chunk listeners; failed chunks are collected for the terminal status.
async fn apply_chunk_result<R>(
    execution: &mut StepExecution,
    repository: &R,
    listeners: &Listeners,
    result: BatchResult<ChunkResult>,
    errors: &mut Vec<BatchError>,
) -> BatchResult<()>
where
    R: JobRepository + Sync,
{
    match result {
        Ok(chunk_result) => {
            execution.read_count += chunk_result.read_count;
            execution.write_count += chunk_result.write_count;
            execution.commit_count += 1;
            repository.update_step_execution(execution).await?;

            debug!(
                step = %execution.step_name,
                chunk = chunk_result.index,
                "chunk applied"
            );
            listeners.notify_after_chunk(execution).await;
        }
        Err(err) => errors.push(err),
    }

    Ok(())
}
