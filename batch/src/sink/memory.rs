use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::BatchResult;
use crate::sink::{RecordSink, SinkTransaction};
use crate::types::Record;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Record>,
    commit_count: u64,
    rollback_count: u64,
}

/// An in-memory [`RecordSink`] with staged-commit semantics.
///
/// Writes are staged per transaction and only become visible in
/// [`MemorySink::records`] on commit, mirroring how a transactional store
/// behaves. Mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all committed records in commit order.
    pub async fn records(&self) -> Vec<Record> {
        self.inner.lock().await.records.clone()
    }

    /// Returns the number of committed transactions.
    pub async fn commit_count(&self) -> u64 {
        self.inner.lock().await.commit_count
    }

    /// Returns the number of rolled back transactions.
    pub async fn rollback_count(&self) -> u64 {
        self.inner.lock().await.rollback_count
    }
}

impl RecordSink for MemorySink {
    type Transaction = MemorySinkTransaction;

    async fn begin(&self) -> BatchResult<Self::Transaction> {
        Ok(MemorySinkTransaction {
            inner: self.inner.clone(),
            staged: Vec::new(),
        })
    }
}

/// A transaction staging records against a [`MemorySink`].
#[derive(Debug)]
pub struct MemorySinkTransaction {
    inner: Arc<Mutex<Inner>>,
    staged: Vec<Record>,
}

impl SinkTransaction for MemorySinkTransaction {
    async fn write(&mut self, records: &[Record]) -> BatchResult<()> {
        self.staged.extend_from_slice(records);

        Ok(())
    }

    async fn commit(self) -> BatchResult<()> {
        let mut inner = self.inner.lock().await;
        inner.records.extend(self.staged);
        inner.commit_count += 1;

        Ok(())
    }

    async fn rollback(self) -> BatchResult<()> {
        let mut inner = self.inner.lock().await;
        inner.rollback_count += 1;

        Ok(())
    }
}
