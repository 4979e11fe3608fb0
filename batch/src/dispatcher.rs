//! Task dispatcher backing concurrent chunk commits.

use std::future::Future;

use tokio::task::JoinSet;

use crate::batch_error;
use crate::error::{BatchResult, ErrorKind};

/// Executes submitted units of work on background tasks.
///
/// Submission never blocks beyond enqueueing; results are collected in
/// completion order through [`TaskDispatcher::join_next`]. A panicking unit
/// of work surfaces as an [`ErrorKind::ChunkWorkerPanic`] error rather than
/// tearing down the caller.
#[derive(Debug)]
pub struct TaskDispatcher<T> {
    tasks: JoinSet<BatchResult<T>>,
}

impl<T> TaskDispatcher<T>
where
    T: Send + 'static,
{
    /// Creates a dispatcher with no work in flight.
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Submits a unit of work for background execution.
    pub fn submit<F>(&mut self, work: F)
    where
        F: Future<Output = BatchResult<T>> + Send + 'static,
    {
        self.tasks.spawn(work);
    }

    /// Returns the number of units of work currently in flight.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for the next unit of work to resolve.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn join_next(&mut self) -> Option<BatchResult<T>> {
        match self.tasks.join_next().await? {
            Ok(result) => Some(result),
            Err(err) if err.is_cancelled() => Some(Err(batch_error!(
                ErrorKind::ChunkWorkerPanic,
                "A background worker was cancelled before finishing its work"
            ))),
            Err(err) => Some(Err(batch_error!(
                ErrorKind::ChunkWorkerPanic,
                "A background worker panicked",
                format!("{err}")
            ))),
        }
    }

    /// Drains all in-flight work, collecting results in completion order.
    pub async fn drain(&mut self) -> Vec<BatchResult<T>> {
        let mut results = Vec::with_capacity(self.tasks.len());

        while let Some(result) = self.join_next().await {
            results.push(result);
        }

        results
    }
}

impl<T> Default for TaskDispatcher<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_results_in_completion_order() {
        let mut dispatcher: TaskDispatcher<u64> = TaskDispatcher::new();

        dispatcher.submit(async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(1)
        });
        dispatcher.submit(async { Ok(2) });

        assert_eq!(dispatcher.in_flight(), 2);

        let results = dispatcher.drain().await;
        let values: Vec<u64> = results.into_iter().map(|result| result.unwrap()).collect();

        assert_eq!(values, vec![2, 1]);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn panicking_work_surfaces_as_an_error() {
        let mut dispatcher: TaskDispatcher<()> = TaskDispatcher::new();

        dispatcher.submit(async { panic!("boom") });

        let err = dispatcher.join_next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkWorkerPanic);
    }

    #[tokio::test]
    async fn join_next_returns_none_when_idle() {
        let mut dispatcher: TaskDispatcher<()> = TaskDispatcher::new();

        assert!(dispatcher.join_next().await.is_none());
    }
}
