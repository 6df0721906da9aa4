/*
 * Correct but extremely unfair.
 *
 * The thread that has just released the lock still owns the cache line
 * => it's the first to see the 0 and likely to grab the lock again right away.
 * The others may starve for quite some time. No queueing, no backoff.
 */

use std::sync::atomic::{AtomicU32, Ordering::SeqCst};

use crate::raw_lock::{ParticipantId, RawLock};

// 0 - free, 1 - held
pub struct UnfairSpinLock {
    state: AtomicU32,
}

impl UnfairSpinLock {
    pub const fn new() -> Self {
        Self {
            state: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> u32 {
        self.state.load(SeqCst)
    }
}

impl Default for UnfairSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for UnfairSpinLock {
    fn acquire(&self, _id: ParticipantId) {
        // spin till we're the one who swapped 0 for 1
        while self
            .state
            .compare_exchange(0, 1, SeqCst, SeqCst)
            .is_err()
        {
            std::hint::spin_loop(); // give a hint to CPU that this loop is waiting
        }
    }

    fn release(&self, _id: ParticipantId) {
        self.state.store(0, SeqCst);
    }

    fn is_locked(&self) -> bool {
        self.state() != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{
        sync::atomic::AtomicU64,
        thread::{scope, sleep},
        time::Duration,
    };

    #[test]
    fn test_round_trip() {
        let lock = UnfairSpinLock::new();
        lock.acquire(0);
        assert_eq!(lock.state(), 1);
        lock.release(0);
        assert_eq!(lock.state(), 0);
    }

    #[test]
    fn test_spins_until_released() {
        let lock = UnfairSpinLock::new();
        let g = lock.lock(0);
        scope(|s| {
            let t = s.spawn(|| {
                let _g = lock.lock(1);
            });
            sleep(Duration::from_millis(50));
            // still spinning
            assert!(!t.is_finished());
            drop(g);
        });
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_exclusion() {
        let lock = UnfairSpinLock::new();
        let inside = AtomicU64::new(0);
        let entries = AtomicU64::new(0);
        scope(|s| {
            for id in 0..4 {
                let (lock, inside, entries) = (&lock, &inside, &entries);
                s.spawn(move || {
                    for _ in 0..50_000 {
                        let _g = lock.lock(id);
                        assert_eq!(inside.fetch_add(1, SeqCst), 0);
                        entries.fetch_add(1, SeqCst);
                        inside.fetch_sub(1, SeqCst);
                    }
                });
            }
        });
        assert_eq!(entries.load(SeqCst), 200_000);
    }
}
