//! Scoped worker pool shared by every parallel solver
//!
//! Each solve spawns its own set of named threads on a [`std::thread::scope`],
//! pins them according to the solver's [`AffinityPolicy`] and waits on a
//! completion channel until every worker has reported back.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::affinity::AffinityPolicy;

/// Releases everything blocked on a shared synchronization primitive.
///
/// Once aborted, every current and future wait on the primitive panics.
pub(crate) trait Abort: Sync {
    fn abort(&self);
}

/// What one worker did during a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerReport {
    /// Worker index in `[0, workers)`
    pub worker: usize,
    /// Number of cells this worker computed
    pub cells: usize,
    /// Number of times this worker was suspended (gate or barrier sleeps,
    /// timed polls, yields)
    pub waits: usize,
}

impl WorkerReport {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Default::default()
        }
    }
}

/// Per-worker outcome of one `solve` call, ordered by worker index.
///
/// Empty when the table was already solved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveReport {
    pub workers: Vec<WorkerReport>,
}

impl SolveReport {
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Total number of cells computed
    pub fn cells(&self) -> usize {
        self.workers.iter().map(|report| report.cells).sum()
    }

    /// Total number of suspensions across all workers
    pub fn waits(&self) -> usize {
        self.workers.iter().map(|report| report.waits).sum()
    }
}

const NO_PANIC: usize = usize::MAX;

/// Aborts the shared primitive if the owning worker unwinds.
struct AbortOnPanic<'a> {
    worker: usize,
    shared: &'a dyn Abort,
    first_panic: &'a AtomicUsize,
}

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            // Peers released by the abort panic too; remember who started it.
            let _ = self.first_panic.compare_exchange(
                NO_PANIC,
                self.worker,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            self.shared.abort();
        }
    }
}

/// Runs `body(worker)` on `workers` threads and collects their reports.
///
/// Threads are named `{name}-{worker}`. If a worker panics, `shared` is
/// aborted so its peers stop waiting for it, and the panic of the worker that
/// failed first is resumed on the calling thread once every worker has exited.
///
/// # Panics
///
/// Panics if a worker panics or a thread cannot be spawned.
pub(crate) fn run_workers<F>(
    name: &str,
    workers: usize,
    affinity: AffinityPolicy,
    shared: &dyn Abort,
    body: F,
) -> SolveReport
where
    F: Fn(usize) -> WorkerReport + Sync,
{
    let (done_tx, done_rx) = mpsc::channel();
    let first_panic = AtomicUsize::new(NO_PANIC);

    let mut reports = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let done_tx = done_tx.clone();
            let body = &body;
            let first_panic = &first_panic;
            let spawned = thread::Builder::new()
                .name(format!("{name}-{worker}"))
                .spawn_scoped(scope, move || {
                    let _abort = AbortOnPanic {
                        worker,
                        shared,
                        first_panic,
                    };
                    let _pin = affinity.pin_worker(worker);
                    let report = body(worker);
                    // The receiver only goes away once every sender is gone.
                    let _ = done_tx.send(report);
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    shared.abort();
                    panic!("failed to spawn worker {name}-{worker}: {err}");
                }
            }
        }
        drop(done_tx);

        // Completion countdown: ends once every worker has sent or died.
        let reports: Vec<WorkerReport> = done_rx.iter().collect();

        let origin = first_panic.load(Ordering::Acquire);
        let mut payload = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if let Err(err) = handle.join() {
                if worker == origin || payload.is_none() {
                    payload = Some(err);
                }
            }
        }
        if let Some(payload) = payload {
            panic::resume_unwind(payload);
        }
        reports
    });

    reports.sort_unstable_by_key(|report| report.worker);
    for report in &reports {
        debug!(
            solver = name,
            worker = report.worker,
            cells = report.cells,
            waits = report.waits,
            "worker finished"
        );
    }
    SolveReport { workers: reports }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateArray;

    #[test]
    fn test_reports_are_ordered_by_worker() {
        let gates = GateArray::new(4);
        let report = run_workers("test", 4, AffinityPolicy::Disabled, &gates, |worker| {
            WorkerReport {
                worker,
                cells: worker * 10,
                waits: 1,
            }
        });

        let workers: Vec<_> = report.workers.iter().map(|r| r.worker).collect();
        assert_eq!(workers, vec![0, 1, 2, 3]);
        assert_eq!(report.cells(), 60);
        assert_eq!(report.waits(), 4);
    }

    #[test]
    fn test_threads_are_named_after_solver() {
        let gates = GateArray::new(1);
        run_workers("Named[1]", 1, AffinityPolicy::Disabled, &gates, |worker| {
            assert_eq!(thread::current().name(), Some("Named[1]-0"));
            WorkerReport::new(worker)
        });
    }

    #[test]
    #[should_panic(expected = "worker 1 exploded")]
    fn test_panic_aborts_blocked_peers_and_propagates() {
        let gates = GateArray::new(2);
        let started = AtomicUsize::new(0);

        run_workers("test", 2, AffinityPolicy::Disabled, &gates, |worker| {
            started.fetch_add(1, Ordering::SeqCst);
            if worker == 1 {
                // Let worker 0 block first so the abort has someone to release.
                while started.load(Ordering::SeqCst) < 2 {
                    thread::yield_now();
                }
                panic!("worker 1 exploded");
            }
            gates.wait_until(1, || false);
            WorkerReport::new(worker)
        });
    }

    #[test]
    fn test_empty_report() {
        let report = SolveReport::default();
        assert!(report.is_empty());
        assert_eq!(report.cells(), 0);
    }
}
