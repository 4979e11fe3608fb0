//! Batch runner service binary.
//!
//! Loads configuration, initializes tracing, builds the configured job and
//! launches it to completion. The process exit code reflects the job outcome:
//! zero for a completed job, non-zero otherwise.

use std::process::ExitCode as ProcessExitCode;

use tracing::error;

use batch::types::ExitCode;
use batch_config::shared::RunnerConfig;

use crate::config::load_runner_config;
use crate::core::run_job_with_config;
use crate::error::{RunnerError, RunnerResult};

mod config;
mod core;
mod error;
mod listeners;

fn main() -> ProcessExitCode {
    match run() {
        Ok(ExitCode::Completed) => ProcessExitCode::SUCCESS,
        Ok(_) => ProcessExitCode::FAILURE,
        Err(err) => {
            // Tracing may not be initialized yet, so report on stderr as well.
            eprintln!("{err}");
            error!("{err}");

            ProcessExitCode::FAILURE
        }
    }
}

fn run() -> RunnerResult<ExitCode> {
    let runner_config = load_runner_config()?;

    batch_telemetry::tracing::init_tracing(env!("CARGO_BIN_NAME"))
        .map_err(RunnerError::config)?;

    let exit_code = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(runner_config))?;

    Ok(exit_code)
}

async fn async_main(runner_config: RunnerConfig) -> RunnerResult<ExitCode> {
    run_job_with_config(runner_config).await
}
