//! Sliding-window scheduler for independent async operations.

use crate::core::{UpdaterError, UpdaterResult};
use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// Default number of operations allowed in flight.
pub const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Runs operations with at most `max_concurrent` in flight.
///
/// Operations are spawned in input order. Once the window is full the runner
/// waits for whichever operation finishes first before spawning the next.
/// A failure never cancels the others; every spawned operation is awaited.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRunner {
    max_concurrent: usize,
}

/// Outcome of a [`BoundedRunner::run`] call.
#[derive(Debug)]
pub struct RunSummary<T> {
    /// Results of successful operations, in completion order
    pub succeeded: Vec<T>,
    /// Errors of failed operations, in completion order
    pub failures: Vec<UpdaterError>,
}

impl<T> RunSummary<T> {
    fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    /// All results, or the first failure that completed.
    pub fn into_result(self) -> UpdaterResult<Vec<T>> {
        match self.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.succeeded),
        }
    }

    fn record(&mut self, joined: Result<UpdaterResult<T>, JoinError>) {
        match joined {
            Ok(Ok(value)) => self.succeeded.push(value),
            Ok(Err(error)) => self.failures.push(error),
            Err(join_error) => {
                tracing::warn!(error = %join_error, "update task aborted");
                self.failures
                    .push(UpdaterError::Io(std::io::Error::other(join_error)));
            }
        }
    }
}

impl Default for BoundedRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

impl BoundedRunner {
    /// Create a runner; a limit of zero is treated as one.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Drive every operation to completion.
    pub async fn run<I, F, T>(&self, operations: I) -> RunSummary<T>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = UpdaterResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let mut summary = RunSummary::new();
        let mut join_set = JoinSet::new();

        for operation in operations {
            if join_set.len() >= self.max_concurrent {
                // Wait for any one operation before admitting another
                if let Some(joined) = join_set.join_next().await {
                    summary.record(joined);
                }
            }
            join_set.spawn(operation);
        }

        while let Some(joined) = join_set.join_next().await {
            summary.record(joined);
        }

        summary
    }
}
