//! # Compare-and-swap mutex
//! The 3-state futex mutex. The state says not just "locked" but whether anybody may be sleeping on it:
//! - 0 - unlocked
//! - 1 - locked, no waiters
//! - 2 - locked, there might be waiters
//!
//! The point is to skip syscalls whenever possible:
//! nobody else around => lock is one CAS, unlock is one `fetch_sub`, no park, no wake.
//!
//! Whoever gets the lock after having waited stores 2, not 1: it can't know whether it was the last waiter.
//! An extra wake is cheap, a lost one is a hang.

use std::sync::atomic::{AtomicU32, Ordering::SeqCst};

use super::wait_queue::{Futex, WaitQueue};
use crate::raw_lock::{ParticipantId, RawLock};

const UNLOCKED: u32 = 0;
const LOCKED: u32 = 1;
const CONTENDED: u32 = 2;

pub struct CasMutex<Q: WaitQueue = Futex> {
    state: AtomicU32,
    queue: Q,
}

impl CasMutex {
    pub const fn new() -> Self {
        Self::with_queue(Futex)
    }
}

impl Default for CasMutex {
    fn default() -> Self {
        Self::new()
    }
}

/// CAS returning the previous value, whether the swap happened or not
fn cas(state: &AtomicU32, current: u32, new: u32) -> u32 {
    match state.compare_exchange(current, new, SeqCst, SeqCst) {
        Ok(v) | Err(v) => v,
    }
}

impl<Q: WaitQueue> CasMutex<Q> {
    pub const fn with_queue(queue: Q) -> Self {
        Self {
            state: AtomicU32::new(UNLOCKED),
            queue,
        }
    }

    pub fn state(&self) -> u32 {
        self.state.load(SeqCst)
    }

    pub fn lock_raw(&self) {
        let c = cas(&self.state, UNLOCKED, LOCKED);
        if c != UNLOCKED {
            // uncontested case missed
            self.lock_contended(c);
        }
    }

    #[cold]
    fn lock_contended(&self, mut c: u32) {
        loop {
            // somebody already flagged waiters, or we flag them now.
            // A 0 from the second CAS means it got unlocked meanwhile => straight to the grab below
            if c == CONTENDED || cas(&self.state, LOCKED, CONTENDED) != UNLOCKED {
                self.queue.park(&self.state, CONTENDED);
            }
            // woken up or skipped the sleep, other waiters may be around either way
            c = cas(&self.state, UNLOCKED, CONTENDED);
            if c == UNLOCKED {
                return;
            }
        }
    }

    pub fn unlock_raw(&self) {
        if self.state.fetch_sub(1, SeqCst) != LOCKED {
            // there might be somebody sleeping
            self.state.store(UNLOCKED, SeqCst);
            self.queue.wake_one(&self.state);
        }
    }
}

impl<Q: WaitQueue> RawLock for CasMutex<Q> {
    fn acquire(&self, _id: ParticipantId) {
        self.lock_raw()
    }

    fn release(&self, _id: ParticipantId) {
        self.unlock_raw()
    }

    fn is_locked(&self) -> bool {
        self.state() != UNLOCKED
    }
}
