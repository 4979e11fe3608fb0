use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use batch::job::{Job, JobExecutor};
use batch::listener::Listeners;
use batch::repository::memory::MemoryRepository;
use batch::sink::postgres::PostgresSink;
use batch::source::delimited::DelimitedFileSource;
use batch::step::Step;
use batch::types::{ExitCode, JobParameters};
use batch_config::shared::RunnerConfig;

use crate::error::RunnerResult;
use crate::listeners::{LoggingChunkListener, LoggingJobListener, LoggingStepListener};

/// Builds the configured job and launches it to a terminal status.
///
/// Every launch adds a `launch.time` parameter so each invocation is a new
/// logical run; duplicate-run protection still applies within the process.
/// Returns the job's exit code for the process to propagate.
pub async fn run_job_with_config(runner_config: RunnerConfig) -> RunnerResult<ExitCode> {
    info!("starting batch runner");

    log_config(&runner_config);

    let repository = MemoryRepository::new();
    let listeners = Listeners::new()
        .with_job_listener(Arc::new(LoggingJobListener))
        .with_step_listener(Arc::new(LoggingStepListener))
        .with_chunk_listener(Arc::new(LoggingChunkListener));
    let executor = JobExecutor::new(repository, listeners);

    // A Ctrl-C requests a graceful stop; the current chunk still commits.
    let stop = executor.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("stop requested, finishing in-flight chunks");
            stop.stop();
        }
    });

    let mut job = Job::new(runner_config.job.name.clone());
    for step_config in runner_config.job.steps {
        let source = DelimitedFileSource::new(step_config.source);

        // The pool must cover every chunk transaction allowed in flight.
        let max_connections = step_config.chunk.max_in_flight_chunks as u32 + 1;
        let sink = PostgresSink::connect(
            &runner_config.pg_connection,
            &step_config.sink,
            max_connections,
        )
        .await?;

        job = job.add_step(Step::new(
            step_config.name,
            source,
            sink,
            &step_config.chunk,
        ));
    }

    let parameters = JobParameters::builder()
        .add_long("launch.time", Utc::now().timestamp_millis())
        .build();

    let execution = executor.launch(job, parameters).await?;

    info!(
        job = %execution.job_name,
        exit_code = execution.exit_status.code.as_str(),
        "batch runner finished"
    );

    Ok(execution.exit_status.code)
}

/// Logs the non-sensitive parts of the runner configuration.
fn log_config(config: &RunnerConfig) {
    debug!(
        job = %config.job.name,
        steps = config.job.steps.len(),
        pg_host = %config.pg_connection.host,
        pg_database = %config.pg_connection.name,
        "loaded configuration"
    );
}
