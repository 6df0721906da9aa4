//! # Two-process lock
//! Peterson's algorithm: mutual exclusion for exactly 2 participants with nothing but loads and stores.
//!
//! Each participant raises its intent flag, volunteers to be the `looser` (the one who yields on a tie),
//! then waits while the other one is interested *and* it is still the looser.
//! Whoever wrote `looser` last yields => no deadlock and no starvation with 2 contenders.
//!
//! ## Why the barrier
//! The algorithm silently assumes sequential consistency: my store to `wants_to_enter[id]`
//! is visible before I read `wants_to_enter[other]`. Neither x86-64 (store buffer) nor ARM64 promise that
//! for plain stores and loads. Without a full barrier both participants may read a stale `false`
//! and walk into the critical section together.
//!
//! [`BrokenPetersonLock`] is the very same code with the barrier elided.
//! It's wrong on purpose and is there to be caught by the race harness. Don't "fix" it.
//!
//! The intent is a `Relaxed` store in `acquire`, the `volatile` write of the textbook version.
//! The tie-breaker is a `Release` store so the two stores can't swap places.
//! Nothing but [`full_barrier`] orders them against the spin-reads.

use std::sync::atomic::{
    AtomicBool, AtomicUsize,
    Ordering::{Acquire, Relaxed, Release},
};

use crate::barrier::full_barrier;
use crate::raw_lock::{ParticipantId, RawLock};

pub struct TwoProcessLock<const FENCED: bool> {
    wants_to_enter: [AtomicBool; 2],
    looser: AtomicUsize,
}

/// Peterson's lock with the barrier in place.
pub type PetersonLock = TwoProcessLock<true>;

/// BROKEN ON PURPOSE: [`PetersonLock`] without the barrier.
pub type BrokenPetersonLock = TwoProcessLock<false>;

/// Plain copy of the lock words, see [`TwoProcessLock::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoProcessState {
    pub wants_to_enter: [bool; 2],
    pub looser: ParticipantId,
}

impl<const FENCED: bool> TwoProcessLock<FENCED> {
    pub const fn new() -> Self {
        Self {
            wants_to_enter: [AtomicBool::new(false), AtomicBool::new(false)],
            looser: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> TwoProcessState {
        TwoProcessState {
            wants_to_enter: [
                self.wants_to_enter[0].load(Relaxed),
                self.wants_to_enter[1].load(Relaxed),
            ],
            looser: self.looser.load(Relaxed),
        }
    }
}

impl<const FENCED: bool> Default for TwoProcessLock<FENCED> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const FENCED: bool> RawLock for TwoProcessLock<FENCED> {
    /// # Panics
    /// if `id` is neither 0 nor 1
    fn acquire(&self, id: ParticipantId) {
        assert!(id < 2, "two-process lock participant must be 0 or 1, got {id}");
        let other = 1 - id;

        self.wants_to_enter[id].store(true, Relaxed);
        // Release: the intent has to be visible before the tie-breaker,
        // ARM may publish two plain stores in either order. Still a plain `mov` on x86
        self.looser.store(id, Release);

        // the only difference between the two flavours
        if FENCED {
            full_barrier();
        }

        while self.wants_to_enter[other].load(Acquire) && self.looser.load(Acquire) == id {
            std::hint::spin_loop();
        }
    }

    fn release(&self, id: ParticipantId) {
        // the next acquire's barrier covers the ordering
        self.wants_to_enter[id].store(false, Release);
    }

    fn is_locked(&self) -> bool {
        self.wants_to_enter.iter().any(|w| w.load(Relaxed))
    }

    fn capacity(&self) -> Option<usize> {
        Some(2)
    }
}
