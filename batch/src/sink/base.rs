use std::future::Future;

use crate::error::BatchResult;
use crate::types::Record;

/// One atomic unit of sink work covering a single chunk.
///
/// A transaction is consumed by [`SinkTransaction::commit`] or
/// [`SinkTransaction::rollback`]; dropping it without either is equivalent to
/// a rollback. Records written before a rollback must leave no trace in the
/// sink.
pub trait SinkTransaction: Send {
    /// Writes a batch of records inside this transaction.
    fn write(&mut self, records: &[Record]) -> impl Future<Output = BatchResult<()>> + Send;

    /// Makes all writes of this transaction durable.
    fn commit(self) -> impl Future<Output = BatchResult<()>> + Send;

    /// Discards all writes of this transaction.
    fn rollback(self) -> impl Future<Output = BatchResult<()>> + Send;
}

/// Trait for systems that receive the records a step writes.
///
/// A sink hands out independent transactions, one per chunk. Transactions
/// opened from the same sink may be in flight concurrently, so
/// implementations must not share mutable per-transaction state.
pub trait RecordSink {
    /// The transaction type this sink produces.
    type Transaction: SinkTransaction + Send + 'static;

    /// Opens a new transaction against the sink.
    fn begin(&self) -> impl Future<Output = BatchResult<Self::Transaction>> + Send;
}
