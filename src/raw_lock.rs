//! # Raw lock capability
//! Everything the race harness needs from a lock: `acquire(id)` and `release(id)`.
//! No data is attached to the lock (unlike `SpinLock<Y>` / `Mutex<Y>`),
//! the critical section is whatever the caller does in between.

use std::ops::Deref;

/// Index of a worker racing for the lock: 0 or 1 for the two-process lock, `0..N` otherwise.
pub type ParticipantId = usize;

pub trait RawLock: Sync {
    /// Blocks (spinning or parking) until `id` holds the lock.
    fn acquire(&self, id: ParticipantId);

    /// Gives the lock up.
    ///
    /// Calling it without holding the lock breaks the lock for everybody, nothing checks that.
    fn release(&self, id: ParticipantId);

    /// Whether somebody holds the lock (or is on the way in) right now. Racy by nature.
    fn is_locked(&self) -> bool;

    /// Max number of distinct participants, `None` if unbounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// The guarded flavour of [`RawLock::acquire`]: dropping the guard releases the lock.
    fn lock(&self, id: ParticipantId) -> LockGuard<'_, Self>
    where
        Self: Sized,
    {
        self.acquire(id);
        LockGuard { lock: self, id }
    }
}

/// Proof of holding `lock` as `id`. The only way to make one is [`RawLock::lock`].
pub struct LockGuard<'a, L: RawLock> {
    lock: &'a L,
    id: ParticipantId,
}

impl<L: RawLock> Deref for LockGuard<'_, L> {
    type Target = L;
    fn deref(&self) -> &Self::Target {
        self.lock
    }
}

impl<L: RawLock> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.release(self.id);
    }
}
