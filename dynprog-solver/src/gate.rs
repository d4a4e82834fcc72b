//! Per-worker wait/notify gates
//!
//! Worker `w` signals gate `w` whenever it has published progress; a worker
//! that needs `w`'s progress blocks on gate `w` until its own predicate holds.
//! The predicate is evaluated while holding the gate's mutex, and signalling
//! takes the same mutex, so a signal issued after the predicate was found
//! false always reaches the waiter.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::worker::Abort;

#[derive(Debug, Default)]
#[repr(align(128))]
struct Gate {
    /// Number of signals delivered so far.
    epoch: Mutex<u64>,
    wake: Condvar,
}

/// One gate per worker index.
#[derive(Debug)]
pub struct GateArray {
    gates: Box<[Gate]>,
    aborted: AtomicBool,
}

impl GateArray {
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "gate array needs at least one gate");
        Self {
            gates: (0..count).map(|_| Gate::default()).collect(),
            aborted: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Wakes every worker blocked on gate `worker`.
    pub fn signal(&self, worker: usize) {
        let gate = self.gate(worker);
        let mut epoch = gate.epoch.lock();
        *epoch = epoch.wrapping_add(1);
        gate.wake.notify_all();
    }

    /// Blocks on gate `worker` until `ready` returns `true`.
    ///
    /// `ready` is re-evaluated after every wake-up, spurious or not. Returns
    /// how many times the caller actually went to sleep.
    ///
    /// # Panics
    ///
    /// Panics if the array was aborted because another worker panicked.
    pub fn wait_until(&self, worker: usize, mut ready: impl FnMut() -> bool) -> usize {
        let gate = self.gate(worker);
        let mut sleeps = 0;
        let mut epoch = gate.epoch.lock();
        while !ready() {
            self.check_aborted();
            gate.wake.wait(&mut epoch);
            sleeps += 1;
        }
        sleeps
    }

    /// Number of signals gate `worker` has delivered.
    #[cfg(test)]
    fn epoch(&self, worker: usize) -> u64 {
        *self.gate(worker).epoch.lock()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Panics if the array was aborted. Workers that poll instead of waiting
    /// call this between polls.
    pub fn check_aborted(&self) {
        if self.is_aborted() {
            panic!("gate wait abandoned: a peer worker panicked");
        }
    }

    fn gate(&self, worker: usize) -> &Gate {
        assert!(
            worker < self.gates.len(),
            "invalid gate index {worker} (have {})",
            self.gates.len()
        );
        &self.gates[worker]
    }
}

impl Abort for GateArray {
    fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        for gate in self.gates.iter() {
            let _epoch = gate.epoch.lock();
            gate.wake.notify_all();
        }
    }
}
