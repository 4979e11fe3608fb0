#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use batch::batch_error;
use batch::error::{BatchResult, ErrorKind};
use batch::listener::{ChunkListener, JobListener, StepListener};
use batch::sink::memory::{MemorySink, MemorySinkTransaction};
use batch::sink::{RecordSink, SinkTransaction};
use batch::types::{Cell, JobExecution, JobParameters, Record, StepExecution};

pub fn init_tracing() {
    batch_telemetry::tracing::init_test_tracing();
}

/// Returns `count` person-shaped records with deterministic values.
pub fn person_records(count: u64) -> Vec<Record> {
    (0..count)
        .map(|index| {
            Record::new(vec![
                Cell::String(format!("first{index}")),
                Cell::String(format!("last{index}")),
                Cell::String("Lisbon".to_string()),
            ])
        })
        .collect()
}

/// Returns a launch timestamp unlikely to collide across launches.
pub fn launch_time() -> i64 {
    rand::random::<u32>() as i64
}

pub fn launch_parameters(time: i64) -> JobParameters {
    JobParameters::builder().add_long("time", time).build()
}

/// A listener recording every callback it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

#[async_trait]
impl JobListener for RecordingListener {
    async fn before_job(&self, _execution: &JobExecution) -> BatchResult<()> {
        self.push("before_job");
        Ok(())
    }

    async fn after_job(&self, _execution: &JobExecution) -> BatchResult<()> {
        self.push("after_job");
        Ok(())
    }
}

#[async_trait]
impl StepListener for RecordingListener {
    async fn before_step(&self, _execution: &StepExecution) -> BatchResult<()> {
        self.push("before_step");
        Ok(())
    }

    async fn after_step(&self, _execution: &StepExecution) -> BatchResult<()> {
        self.push("after_step");
        Ok(())
    }
}

#[async_trait]
impl ChunkListener for RecordingListener {
    async fn after_chunk(&self, execution: &StepExecution) -> BatchResult<()> {
        self.push(format!(
            "after_chunk read={} write={}",
            execution.read_count, execution.write_count
        ));
        Ok(())
    }
}

/// A chunk listener that always fails, for isolation tests.
#[derive(Debug, Clone, Default)]
pub struct FailingChunkListener;

#[async_trait]
impl ChunkListener for FailingChunkListener {
    async fn after_chunk(&self, _execution: &StepExecution) -> BatchResult<()> {
        Err(batch_error!(
            ErrorKind::ListenerError,
            "This listener always fails"
        ))
    }
}

/// A sink that fails the write of one specific transaction.
///
/// Transactions are numbered from one in `begin` order; the transaction whose
/// ordinal matches `fail_on_transaction` rejects its first write. All other
/// transactions behave like a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct FailingSink {
    inner: MemorySink,
    fail_on_transaction: u64,
    begun: Arc<AtomicU64>,
}

impl FailingSink {
    pub fn new(fail_on_transaction: u64) -> Self {
        Self {
            inner: MemorySink::new(),
            fail_on_transaction,
            begun: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn memory(&self) -> &MemorySink {
        &self.inner
    }

    /// Returns how many transactions were opened against this sink.
    pub fn begun_count(&self) -> u64 {
        self.begun.load(Ordering::SeqCst)
    }
}

impl RecordSink for FailingSink {
    type Transaction = FailingSinkTransaction;

    async fn begin(&self) -> BatchResult<Self::Transaction> {
        let ordinal = self.begun.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.begin().await?;

        Ok(FailingSinkTransaction {
            inner,
            fail: ordinal == self.fail_on_transaction,
        })
    }
}

pub struct FailingSinkTransaction {
    inner: MemorySinkTransaction,
    fail: bool,
}

impl SinkTransaction for FailingSinkTransaction {
    async fn write(&mut self, records: &[Record]) -> BatchResult<()> {
        if self.fail {
            return Err(batch_error!(
                ErrorKind::SinkError,
                "The sink rejected the chunk"
            ));
        }

        self.inner.write(records).await
    }

    async fn commit(self) -> BatchResult<()> {
        self.inner.commit().await
    }

    async fn rollback(self) -> BatchResult<()> {
        self.inner.rollback().await
    }
}
