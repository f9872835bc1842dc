//! Concurrent workload harness
//!
//! `concurrency` worker threads share one [`Store`] and one set of atomic
//! counters. Each worker loops:
//!
//! 1. Poll the shared deadline (and the abort flag). Stop if either is set.
//! 2. Run one operation to completion.
//! 3. Bump the shared iteration counter.
//!
//! The deadline is only checked between iterations, so an operation that has
//! started always finishes; a stalled transaction can hold its worker past
//! the deadline. `run` returns after every worker has been joined, so the
//! counters it reports are final.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tpcb_core::{BenchConfig, Error, Result};
use tpcb_storage::Store;
use tracing::{error, info};

use crate::ops::Workload;
use crate::policy::{ErrorPolicy, Verdict, WorkerError};

/// Something a worker can execute repeatedly
pub trait Operation: Sync {
    /// Run one operation to completion, drawing inputs from `rng`
    fn execute(&self, store: &Store, rng: &mut StdRng) -> Result<()>;
}

impl Operation for Workload {
    fn execute(&self, store: &Store, rng: &mut StdRng) -> Result<()> {
        self.run_once(store, rng)
    }
}

impl<F> Operation for F
where
    F: Fn(&Store, &mut StdRng) -> Result<()> + Sync,
{
    fn execute(&self, store: &Store, rng: &mut StdRng) -> Result<()> {
        self(store, rng)
    }
}

/// Run-wide counters, updated with atomic increments only.
#[derive(Debug, Default)]
pub struct Counters {
    iterations: AtomicU64,
    // Reserved for a retry-on-conflict mode; nothing increments it today.
    conflicts: AtomicU64,
}

impl Counters {
    /// Operations completed so far
    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Conflicts counted so far
    pub fn conflicts(&self) -> u64 {
        self.conflicts.load(Ordering::Relaxed)
    }

    fn record_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared stop time, read with the monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `duration` after `start`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the deadline is past what the monotonic
    /// clock can represent.
    pub fn new(start: Instant, duration: Duration) -> Result<Self> {
        let at = start.checked_add(duration).ok_or_else(|| {
            Error::config(format!("benchtime {:?} is out of range", duration))
        })?;
        Ok(Deadline { at })
    }

    /// Whether `now` is at or past the deadline
    pub fn expired_at(&self, now: Instant) -> bool {
        now >= self.at
    }

    /// Whether the deadline has passed
    pub fn expired(&self) -> bool {
        self.expired_at(Instant::now())
    }

    /// Time left from `now`, zero once expired
    pub fn remaining(&self, now: Instant) -> Duration {
        self.at.saturating_duration_since(now)
    }
}

/// Per-worker result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Operations this worker completed
    pub iterations: u64,
    /// Offset from run start at which the worker began its last operation
    pub last_start: Option<Duration>,
}

/// Final counters of a run
#[derive(Debug)]
pub struct RunStats {
    /// Operations completed by all workers
    pub iterations: u64,
    /// Conflicts counted by all workers
    pub conflicts: u64,
    /// One entry per worker, in worker order
    pub workers: Vec<WorkerStats>,
    /// Wall time from start until every worker was joined
    pub elapsed: Duration,
    /// Errors kept by a non-collapsing policy
    pub errors: Vec<WorkerError>,
}

/// Drives `concurrency` workers until the deadline
#[derive(Debug)]
pub struct Harness<'a> {
    store: &'a Store,
    policy: &'a dyn ErrorPolicy,
    concurrency: usize,
    benchtime: Duration,
    seed: Option<u64>,
    progress_interval: Option<Duration>,
}

impl<'a> Harness<'a> {
    /// Harness over `store` using the run settings of `config`
    pub fn new(store: &'a Store, policy: &'a dyn ErrorPolicy, config: &BenchConfig) -> Self {
        Harness {
            store,
            policy,
            concurrency: config.concurrency,
            benchtime: config.benchtime,
            seed: config.seed,
            progress_interval: config.progress_interval,
        }
    }

    /// Run `op` on every worker until the deadline.
    ///
    /// # Errors
    ///
    /// If the policy collapsed the run, returns the error that triggered it
    /// once every worker has exited. No statistics are returned in that case.
    pub fn run<O: Operation>(&self, op: &O) -> Result<RunStats> {
        let counters = Counters::default();
        let abort = AtomicBool::new(false);
        let start = Instant::now();
        let deadline = Deadline::new(start, self.benchtime)?;
        info!(
            concurrency = self.concurrency,
            benchtime = ?self.benchtime,
            "starting workload"
        );

        let workers = thread::scope(|s| {
            let counters = &counters;
            let abort = &abort;
            if let Some(interval) = self.progress_interval {
                s.spawn(move || report_progress(interval, deadline, counters, abort));
            }
            let handles: Vec<_> = (0..self.concurrency)
                .map(|worker| {
                    s.spawn(move || self.worker_loop(worker, op, start, deadline, counters, abort))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect::<Vec<_>>()
        });
        let elapsed = start.elapsed();

        let mut errors = self.policy.take_errors();
        if abort.load(Ordering::Acquire) {
            return Err(if errors.is_empty() {
                Error::Aborted
            } else {
                errors.swap_remove(0).error
            });
        }

        let stats = RunStats {
            iterations: counters.iterations(),
            conflicts: counters.conflicts(),
            workers,
            elapsed,
            errors,
        };
        info!(
            concurrency = self.concurrency,
            iterations = stats.iterations,
            conflicts = stats.conflicts,
            "throughput results"
        );
        Ok(stats)
    }

    fn worker_loop<O: Operation>(
        &self,
        worker: usize,
        op: &O,
        start: Instant,
        deadline: Deadline,
        counters: &Counters,
        abort: &AtomicBool,
    ) -> WorkerStats {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => StdRng::from_entropy(),
        };
        let mut stats = WorkerStats::default();
        loop {
            let now = Instant::now();
            if abort.load(Ordering::Acquire) || deadline.expired_at(now) {
                break;
            }
            stats.last_start = Some(now - start);
            match op.execute(self.store, &mut rng) {
                Ok(()) => {
                    counters.record_iteration();
                    stats.iterations += 1;
                }
                Err(e) => {
                    error!(worker, error = %e, "operation failed");
                    match self.policy.on_error(worker, e) {
                        Verdict::StopWorker => break,
                        Verdict::AbortRun => {
                            abort.store(true, Ordering::Release);
                            break;
                        }
                    }
                }
            }
        }
        stats
    }
}

fn report_progress(interval: Duration, deadline: Deadline, counters: &Counters, abort: &AtomicBool) {
    const SLICE: Duration = Duration::from_millis(100);
    // `None` once the next report would fall past the clock's range.
    let mut next = Instant::now().checked_add(interval);
    loop {
        let now = Instant::now();
        if abort.load(Ordering::Acquire) || deadline.expired_at(now) {
            return;
        }
        if let Some(due) = next.filter(|due| now >= *due) {
            info!(iterations = counters.iterations(), "progress");
            next = due.checked_add(interval);
        }
        let mut pause = SLICE.min(deadline.remaining(now));
        if let Some(due) = next {
            pause = pause.min(due.saturating_duration_since(now));
        }
        thread::sleep(pause);
    }
}
