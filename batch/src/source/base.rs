use std::future::Future;

use crate::error::BatchResult;
use crate::types::Record;

/// Trait for systems that produce the records a step reads.
///
/// A [`RecordSource`] yields an ordered, finite sequence of records and
/// signals exhaustion explicitly by returning `None`. Sources must be
/// deterministic and restartable from the beginning via [`RecordSource::open`]
/// so a failed run can be retried from scratch.
///
/// Sources are single-cursor: the engine guarantees at most one in-flight
/// traversal, so implementations do not need to tolerate concurrent reads.
pub trait RecordSource {
    /// Prepares the source for reading from the beginning.
    ///
    /// Called once before the first read of a step. The default implementation
    /// is a no-op for sources that need no setup.
    fn open(&mut self) -> impl Future<Output = BatchResult<()>> + Send {
        async { Ok(()) }
    }

    /// Returns the next record, or `None` once the source is exhausted.
    ///
    /// Exhaustion is a state, not a sentinel value: after the first `None`,
    /// subsequent calls keep returning `None` until the source is reopened.
    fn next(&mut self) -> impl Future<Output = BatchResult<Option<Record>>> + Send;
}
