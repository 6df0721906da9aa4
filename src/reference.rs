//! # Reference mutex
//! The control group: a production mutex behind the same [`RawLock`] face.
//! A race run against it must report 0 errors, otherwise it's the harness that's broken.
//!
//! `std::sync::Mutex` only unlocks through its guard, which can't be kept between `acquire` and `release`.
//! `parking_lot`'s raw mutex has a plain lock / unlock pair.

use parking_lot::lock_api::RawMutex as _;

use crate::raw_lock::{ParticipantId, RawLock};

pub struct ReferenceMutex {
    raw: parking_lot::RawMutex,
}

impl ReferenceMutex {
    pub const fn new() -> Self {
        Self {
            raw: parking_lot::RawMutex::INIT,
        }
    }
}

impl Default for ReferenceMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLock for ReferenceMutex {
    fn acquire(&self, _id: ParticipantId) {
        self.raw.lock();
    }

    fn release(&self, _id: ParticipantId) {
        // SAFETY: RawLock's contract, the caller holds the lock
        unsafe { self.raw.unlock() }
    }

    fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip() {
        let lock = ReferenceMutex::new();
        {
            let _g = lock.lock(3);
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
        assert_eq!(lock.capacity(), None);
    }
}
