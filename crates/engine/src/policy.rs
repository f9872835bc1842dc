//! What a worker does when an operation fails
//!
//! The benchmark has no retry path: an error either collapses the whole run
//! ([`FailFast`], the default) or, for test harnesses that want to inspect
//! failures, stops only the failing worker ([`CollectErrors`]).

use parking_lot::Mutex;
use tpcb_core::Error;

/// Worker reaction chosen by a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// This worker exits; the others keep running
    StopWorker,
    /// Every worker exits before its next iteration and the run fails
    AbortRun,
}

/// An error observed by a worker
#[derive(Debug)]
pub struct WorkerError {
    /// Index of the worker that failed
    pub worker: usize,
    /// What the operation returned
    pub error: Error,
}

/// Error-handling policy shared by every worker of a run
pub trait ErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Record `error` raised by `worker` and decide what happens next
    fn on_error(&self, worker: usize, error: Error) -> Verdict;

    /// Drain the errors recorded so far
    fn take_errors(&self) -> Vec<WorkerError>;
}

/// Collapse the run on the first error.
///
/// Only the first error is kept; workers that fail while the run is already
/// collapsing are ignored.
#[derive(Debug, Default)]
pub struct FailFast {
    first: Mutex<Option<WorkerError>>,
}

impl FailFast {
    /// Policy with no error recorded yet
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorPolicy for FailFast {
    fn on_error(&self, worker: usize, error: Error) -> Verdict {
        let mut first = self.first.lock();
        if first.is_none() {
            *first = Some(WorkerError { worker, error });
        }
        Verdict::AbortRun
    }

    fn take_errors(&self) -> Vec<WorkerError> {
        self.first.lock().take().into_iter().collect()
    }
}

/// Keep every error and stop only the worker that raised it.
#[derive(Debug, Default)]
pub struct CollectErrors {
    errors: Mutex<Vec<WorkerError>>,
}

impl CollectErrors {
    /// Policy with an empty error list
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorPolicy for CollectErrors {
    fn on_error(&self, worker: usize, error: Error) -> Verdict {
        self.errors.lock().push(WorkerError { worker, error });
        Verdict::StopWorker
    }

    fn take_errors(&self) -> Vec<WorkerError> {
        std::mem::take(&mut *self.errors.lock())
    }
}
