//! Reusable rendezvous barrier with abort support
//!
//! `std::sync::Barrier` cannot be released once a participant dies, which
//! would leave the remaining workers of a panicking solve blocked forever.

use parking_lot::{Condvar, Mutex};

use crate::worker::Abort;

#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

/// Cyclic barrier for a fixed number of participants.
#[derive(Debug)]
pub struct RowBarrier {
    participants: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl RowBarrier {
    /// # Panics
    ///
    /// Panics if `participants` is zero.
    pub fn new(participants: usize) -> Self {
        assert!(participants > 0, "barrier needs at least one participant");
        Self {
            participants,
            state: Mutex::new(BarrierState::default()),
            released: Condvar::new(),
        }
    }

    /// Blocks until all participants have called `wait` for the current
    /// generation. Returns `true` for exactly one participant per generation.
    ///
    /// # Panics
    ///
    /// Panics if the barrier was aborted.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        if state.aborted {
            panic!("barrier abandoned: a peer worker panicked");
        }

        state.arrived += 1;
        if state.arrived == self.participants {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return true;
        }

        let generation = state.generation;
        while state.generation == generation {
            if state.aborted {
                panic!("barrier abandoned: a peer worker panicked");
            }
            self.released.wait(&mut state);
        }
        false
    }

    /// Number of completed rendezvous.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

impl Abort for RowBarrier {
    fn abort(&self) {
        let mut state = self.state.lock();
        state.aborted = true;
        self.released.notify_all();
    }
}
