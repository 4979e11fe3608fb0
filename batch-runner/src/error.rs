use std::error::Error;

use thiserror::Error as ThisError;

use batch::error::BatchError;

/// Result type for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Error type for the runner service.
///
/// Wraps [`BatchError`] for job execution errors and provides variants for
/// infrastructure errors around it.
#[derive(Debug, ThisError)]
pub enum RunnerError {
    /// Job execution error.
    #[error("{0}")]
    Batch(#[from] BatchError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),
    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Creates a configuration error from any source.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        RunnerError::Config(Box::new(err))
    }
}
