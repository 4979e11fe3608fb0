use serde::Deserialize;

use crate::shared::{JobConfig, PgConnectionConfig, ValidationError};

/// Top-level configuration for the batch runner service.
///
/// Does not implement `Serialize` because the connection configuration holds
/// secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// The job to launch.
    pub job: JobConfig,
    /// Connection to the database backing the record sink.
    pub pg_connection: PgConnectionConfig,
}

impl RunnerConfig {
    /// Validates the runner configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.job.validate()
    }
}
