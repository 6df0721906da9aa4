//! # Fetch-and-add mutex
//! BROKEN ON PURPOSE. Kept as the negative example next to [`CasMutex`](super::CasMutex).
//!
//! The state is a counter of "threads that tried": 0 - unlocked, anything else - locked.
//! - lock: `fetch_add(1)`, got 0 => ours. Otherwise park expecting `c + 1` and retry from scratch.
//! - unlock: store 0, wake one.
//!
//! What's wrong with it:
//! - every other contender bumps the counter too, so `c + 1` is stale as soon as there are 2+ waiters
//!   => parking mostly returns right away and waiters burn CPU re-incrementing
//! - unlock wipes the count => waiters lose track of each other, a syscall per unlock even when alone
//! - enough failed attempts wrap the counter around to 0 while the lock is held => two owners
//!
//! The expected value handed to `park` is the flaw, it stays as is.

use std::sync::atomic::{AtomicU32, Ordering::SeqCst};

use super::wait_queue::{Futex, WaitQueue};
use crate::raw_lock::{ParticipantId, RawLock};

pub struct FetchAddMutex<Q: WaitQueue = Futex> {
    state: AtomicU32,
    queue: Q,
}

impl FetchAddMutex {
    pub const fn new() -> Self {
        Self::with_queue(Futex)
    }
}

impl Default for FetchAddMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: WaitQueue> FetchAddMutex<Q> {
    pub const fn with_queue(queue: Q) -> Self {
        Self {
            state: AtomicU32::new(0),
            queue,
        }
    }

    pub fn state(&self) -> u32 {
        self.state.load(SeqCst)
    }

    pub fn lock_raw(&self) {
        loop {
            let c = self.state.fetch_add(1, SeqCst);
            if c == 0 {
                return;
            }
            self.queue.park(&self.state, c.wrapping_add(1));
        }
    }

    pub fn unlock_raw(&self) {
        self.state.store(0, SeqCst);
        self.queue.wake_one(&self.state);
    }
}

impl<Q: WaitQueue> RawLock for FetchAddMutex<Q> {
    fn acquire(&self, _id: ParticipantId) {
        self.lock_raw()
    }

    fn release(&self, _id: ParticipantId) {
        self.unlock_raw()
    }

    fn is_locked(&self) -> bool {
        self.state() != 0
    }
}
