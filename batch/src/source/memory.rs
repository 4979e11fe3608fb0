use crate::error::BatchResult;
use crate::source::RecordSource;
use crate::types::Record;

/// An in-memory [`RecordSource`] yielding a fixed sequence of records.
///
/// Mostly useful in tests and examples. Reopening rewinds the cursor to the
/// first record.
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Vec<Record>,
    cursor: usize,
}

impl MemorySource {
    /// Creates a source over the supplied records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records, cursor: 0 }
    }
}

impl RecordSource for MemorySource {
    async fn open(&mut self) -> BatchResult<()> {
        self.cursor = 0;

        Ok(())
    }

    async fn next(&mut self) -> BatchResult<Option<Record>> {
        let Some(record) = self.records.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        Ok(Some(record.clone()))
    }
}
