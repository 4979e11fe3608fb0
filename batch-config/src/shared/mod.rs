//! Shared configuration types for batch jobs.

mod base;
mod chunk;
mod connection;
mod job;
mod runner;
mod sink;
mod source;

pub use base::ValidationError;
pub use chunk::ChunkConfig;
pub use connection::PgConnectionConfig;
pub use job::{JobConfig, StepConfig};
pub use runner::RunnerConfig;
pub use sink::InsertSinkConfig;
pub use source::DelimitedSourceConfig;
