//! Chunk accumulation and transactional chunk commits.
//!
//! A chunk is the unit of transfer between source and sink: up to
//! `chunk_size` records accumulated from the source, then written and
//! committed as one sink transaction. Chunks are transient; only the
//! resulting counters survive in the step execution.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::BatchResult;
use crate::sink::{RecordSink, SinkTransaction};
use crate::source::RecordSource;
use crate::types::Record;

/// An ordered batch of records accumulated from the source.
#[derive(Debug)]
pub struct Chunk {
    /// Zero-based position of this chunk within the step.
    pub index: u64,
    /// The accumulated records, in source order.
    pub records: Vec<Record>,
    /// Whether the source was exhausted while filling this chunk.
    pub last: bool,
}

/// Counters produced by one committed chunk.
#[derive(Debug, Clone, Copy)]
pub struct ChunkResult {
    /// Zero-based position of the committed chunk within the step.
    pub index: u64,
    /// Number of records read into the chunk.
    pub read_count: u64,
    /// Number of records written by the chunk transaction.
    pub write_count: u64,
    /// Whether this was the final chunk of the step.
    pub last: bool,
}

/// Turns a source cursor and a sink into chunk-sized units of work.
#[derive(Debug, Clone)]
pub struct ChunkProcessor<K> {
    sink: K,
    chunk_size: usize,
}

impl<K> ChunkProcessor<K>
where
    K: RecordSink + Clone + Send + Sync + 'static,
{
    /// Creates a processor producing chunks of at most `chunk_size` records.
    pub fn new(sink: K, chunk_size: usize) -> Self {
        Self { sink, chunk_size }
    }

    /// Accumulates the next chunk from `source`.
    ///
    /// Returns `None` when the source is exhausted without yielding a record.
    /// An undersized final chunk is returned with its `last` flag set.
    pub async fn accumulate<S>(&self, source: &mut S, index: u64) -> BatchResult<Option<Chunk>>
    where
        S: RecordSource + Send,
    {
        let mut records = Vec::with_capacity(self.chunk_size);
        let mut last = false;

        while records.len() < self.chunk_size {
            match source.next().await? {
                Some(record) => records.push(record),
                None => {
                    last = true;
                    break;
                }
            }
        }

        if records.is_empty() {
            return Ok(None);
        }

        Ok(Some(Chunk {
            index,
            records,
            last,
        }))
    }

    /// Returns the unit of work that commits `chunk` to the sink.
    ///
    /// The returned future owns everything it needs, so it can be dispatched
    /// to a worker task. It opens a transaction, writes all records of the
    /// chunk and commits; on a write failure the transaction is rolled back
    /// and the chunk leaves no trace in the sink.
    ///
    /// The `use<K>` bound keeps the `&self` borrow out of the opaque type, so
    /// the future satisfies the `'static` requirement of worker dispatch.
    pub fn commit(
        &self,
        chunk: Chunk,
    ) -> impl Future<Output = BatchResult<ChunkResult>> + Send + use<K> {
        let sink = self.sink.clone();

        async move {
            let count = chunk.records.len() as u64;
            let mut transaction = sink.begin().await?;

            if let Err(err) = transaction.write(&chunk.records).await {
                if let Err(rollback_err) = transaction.rollback().await {
                    warn!(error = %rollback_err, "failed to roll back chunk transaction");
                }

                return Err(err);
            }

            transaction.commit().await?;
            debug!(chunk = chunk.index, records = count, "chunk committed");

            Ok(ChunkResult {
                index: chunk.index,
                read_count: count,
                write_count: count,
                last: chunk.last,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::memory::MemorySink;
    use crate::source::memory::MemorySource;
    use crate::types::Cell;

    fn records(count: i64) -> Vec<Record> {
        (0..count)
            .map(|value| Record::new(vec![Cell::I64(value)]))
            .collect()
    }

    #[tokio::test]
    async fn accumulate_splits_records_into_chunks() {
        let processor = ChunkProcessor::new(MemorySink::new(), 3);
        let mut source = MemorySource::new(records(7));

        let first = processor.accumulate(&mut source, 0).await.unwrap().unwrap();
        assert_eq!(first.records.len(), 3);
        assert!(!first.last);

        let second = processor.accumulate(&mut source, 1).await.unwrap().unwrap();
        assert_eq!(second.records.len(), 3);
        assert!(!second.last);

        let third = processor.accumulate(&mut source, 2).await.unwrap().unwrap();
        assert_eq!(third.records.len(), 1);
        assert!(third.last);

        assert!(processor.accumulate(&mut source, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exact_multiple_marks_last_on_the_following_read() {
        let processor = ChunkProcessor::new(MemorySink::new(), 3);
        let mut source = MemorySource::new(records(6));

        let first = processor.accumulate(&mut source, 0).await.unwrap().unwrap();
        assert_eq!(first.records.len(), 3);
        assert!(!first.last);

        let second = processor.accumulate(&mut source, 1).await.unwrap().unwrap();
        assert_eq!(second.records.len(), 3);
        assert!(!second.last);

        assert!(processor.accumulate(&mut source, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_futures_outlive_the_processor() {
        let sink = MemorySink::new();
        let processor = ChunkProcessor::new(sink.clone(), 2);
        let mut source = MemorySource::new(records(4));
        let mut dispatcher = crate::dispatcher::TaskDispatcher::new();

        let mut index = 0;
        while let Some(chunk) = processor.accumulate(&mut source, index).await.unwrap() {
            dispatcher.submit(processor.commit(chunk));
            index += 1;
        }

        // The dispatched futures own their sink; nothing borrows the
        // processor once submission is done.
        drop(processor);

        for result in dispatcher.drain().await {
            result.unwrap();
        }

        assert_eq!(sink.commit_count().await, 2);
        assert_eq!(sink.records().await.len(), 4);
    }

    #[tokio::test]
    async fn commit_writes_the_whole_chunk_transactionally() {
        let sink = MemorySink::new();
        let processor = ChunkProcessor::new(sink.clone(), 5);
        let mut source = MemorySource::new(records(4));

        let chunk = processor.accumulate(&mut source, 0).await.unwrap().unwrap();
        let result = processor.commit(chunk).await.unwrap();

        assert_eq!(result.read_count, 4);
        assert_eq!(result.write_count, 4);
        assert!(result.last);
        assert_eq!(sink.records().await.len(), 4);
        assert_eq!(sink.commit_count().await, 1);
    }
}
