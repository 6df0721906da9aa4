use std::sync::atomic::{AtomicU32, AtomicU64, Ordering::Relaxed};

use super::RaceReport;
use crate::raw_lock::ParticipantId;

/// Nobody's tag, the flag's value before the first worker gets in.
pub const NOBODY: u32 = 0;

/// The shared state of one race run, built once before the workers start and read after they're joined.
///
/// All of it goes through atomics, `Relaxed`: the probe must not add any ordering of its own,
/// otherwise it could hide exactly what it's looking for.
pub struct Probe {
    flag: AtomicU32,
    errors: AtomicU64,
    acquisitions: Box<[AtomicU64]>,
}

impl Probe {
    pub fn new(workers: usize) -> Self {
        Self {
            flag: AtomicU32::new(NOBODY),
            errors: AtomicU64::new(0),
            acquisitions: (0..workers).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// What `id` writes to the flag: never [`NOBODY`].
    pub fn tag(id: ParticipantId) -> u32 {
        id as u32 + 1
    }

    pub fn workers(&self) -> usize {
        self.acquisitions.len()
    }

    /// Marks the flag as ours, right after getting the lock.
    pub fn enter(&self, id: ParticipantId) {
        self.acquisitions[id].fetch_add(1, Relaxed);
        self.flag.store(Self::tag(id), Relaxed);
    }

    /// One read of the flag while holding the lock, anything but our tag is an error.
    pub fn check(&self, tag: u32) {
        if self.flag.load(Relaxed) != tag {
            self.errors.fetch_add(1, Relaxed);
        }
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Relaxed)
    }

    pub fn acquisitions(&self) -> Vec<u64> {
        self.acquisitions.iter().map(|a| a.load(Relaxed)).collect()
    }

    pub fn report(&self, iterations: u64) -> RaceReport {
        RaceReport {
            iterations,
            errors: self.errors(),
            acquisitions: self.acquisitions(),
        }
    }
}
