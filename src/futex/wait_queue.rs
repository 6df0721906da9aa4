//! # Wait queues
//! The two futex operations the mutexes rely on:
//! - `park(&AtomicU32, expected)` - sleep, but only if the atomic still holds `expected`; may wake up spuriously
//! - `wake_one(&AtomicU32)` - wake a single thread parked on the same atomic
//!
//! [`Futex`] hands them to the kernel via the `atomic-wait` crate.
//! [`InProcessQueue`] does the same with a lock + condvar, so the mutex logic can be tested
//! and counted without syscalls.

use std::sync::atomic::{
    AtomicU32, AtomicU64,
    Ordering::{Relaxed, SeqCst},
};

use parking_lot::{Condvar, Mutex};

pub trait WaitQueue: Sync {
    /// Blocks while `atom == expected`. Returns right away if it doesn't.
    fn park(&self, atom: &AtomicU32, expected: u32);

    /// Wakes at most one thread parked on `atom`.
    fn wake_one(&self, atom: &AtomicU32);
}

/// The real thing: `FUTEX_WAIT` / `FUTEX_WAKE` on Linux, the closest equivalent elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct Futex;

impl WaitQueue for Futex {
    fn park(&self, atom: &AtomicU32, expected: u32) {
        atomic_wait::wait(atom, expected);
    }

    fn wake_one(&self, atom: &AtomicU32) {
        atomic_wait::wake_one(atom);
    }
}

/// A fake futex for a single process.
///
/// The value check and going to sleep both happen under `lock`, and `wake_one` takes the same lock
/// => a wake issued after the value changed can't slip in between the two.
/// It serves one atomic at a time; waking wakes a parked thread regardless of the address.
#[derive(Default)]
pub struct InProcessQueue {
    lock: Mutex<()>,
    cond: Condvar,
    parks: AtomicU64,
    wakes: AtomicU64,
}

impl InProcessQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a thread actually went to sleep.
    pub fn parks(&self) -> u64 {
        self.parks.load(Relaxed)
    }

    /// How many times `wake_one` was called, whether or not anybody was parked.
    pub fn wakes(&self) -> u64 {
        self.wakes.load(Relaxed)
    }
}

impl WaitQueue for InProcessQueue {
    fn park(&self, atom: &AtomicU32, expected: u32) {
        let mut guard = self.lock.lock();
        if atom.load(SeqCst) != expected {
            return;
        }
        self.parks.fetch_add(1, Relaxed);
        self.cond.wait(&mut guard);
    }

    fn wake_one(&self, _atom: &AtomicU32) {
        self.wakes.fetch_add(1, Relaxed);
        let _guard = self.lock.lock();
        self.cond.notify_one();
    }
}

impl<Q: WaitQueue> WaitQueue for &Q {
    fn park(&self, atom: &AtomicU32, expected: u32) {
        (**self).park(atom, expected)
    }

    fn wake_one(&self, atom: &AtomicU32) {
        (**self).wake_one(atom)
    }
}
