//! # Race check
//! Black-box test of mutual exclusion: no peeking into the lock, only at what holding it should guarantee.
//!
//! Every worker loops:
//! 1. acquire as `id`
//! 2. write its tag (`id + 1`) to the shared probe flag
//! 3. keep re-reading the flag for a while, every read that isn't our tag is an error
//! 4. release
//!
//! With a correct lock nobody else can write the flag in between => 0 errors.
//! A single error proves two workers were in the critical section at once.
//! No error on a broken lock proves nothing: the race needs real parallelism and some luck.

mod config;
mod probe;

pub use config::{BusyWindow, RaceConfig};
pub use probe::Probe;

use std::{error::Error, fmt, thread::scope, time::Instant};

use log::{debug, info};

use crate::raw_lock::{ParticipantId, RawLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceError {
    NoParticipants,
    TooManyParticipants { requested: usize, capacity: usize },
    ProbeTooSmall { workers: usize, slots: usize },
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParticipants => write!(f, "at least one worker is needed"),
            Self::TooManyParticipants {
                requested,
                capacity,
            } => write!(
                f,
                "{requested} workers requested, the lock supports at most {capacity}"
            ),
            Self::ProbeTooSmall { workers, slots } => {
                write!(f, "{workers} workers, but the probe only tracks {slots}")
            }
        }
    }
}

impl Error for RaceError {}

/// What came out of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceReport {
    /// per worker
    pub iterations: u64,
    pub errors: u64,
    /// how many times each worker got the lock, indexed by id
    pub acquisitions: Vec<u64>,
}

impl RaceReport {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    /// Share of the busiest worker in all acquisitions, 1/N means perfectly even.
    /// Every worker ends up with all its iterations done => it's only telling on a mid-run
    /// snapshot, see [`race_with_probe`].
    pub fn dominance(&self) -> f64 {
        let total: u64 = self.acquisitions.iter().sum();
        match self.acquisitions.iter().max() {
            Some(&max) if total > 0 => max as f64 / total as f64,
            _ => 0.0,
        }
    }
}

impl fmt::Display for RaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "iterations: {}, errors: {}", self.iterations, self.errors)
    }
}

/// Runs `config.workers` workers against `lock` and tallies the flag mismatches.
pub fn race<L: RawLock>(lock: &L, config: &RaceConfig) -> Result<RaceReport, RaceError> {
    let probe = Probe::new(config.workers);
    race_with_probe(lock, config, &probe)?;
    Ok(probe.report(config.iterations))
}

/// Same as [`race`], but the caller owns the shared state and may watch it while the workers run.
pub fn race_with_probe<L: RawLock>(
    lock: &L,
    config: &RaceConfig,
    probe: &Probe,
) -> Result<(), RaceError> {
    if config.workers == 0 {
        return Err(RaceError::NoParticipants);
    }
    if let Some(capacity) = lock.capacity() {
        if config.workers > capacity {
            return Err(RaceError::TooManyParticipants {
                requested: config.workers,
                capacity,
            });
        }
    }
    if probe.workers() < config.workers {
        return Err(RaceError::ProbeTooSmall {
            workers: config.workers,
            slots: probe.workers(),
        });
    }

    debug!(
        "starting {} workers, {} iterations each, busy window {}",
        config.workers, config.iterations, config.busy_window
    );
    let started = Instant::now();
    scope(|s| {
        for id in 0..config.workers {
            s.spawn(move || worker(lock, probe, id, config));
        }
    });
    info!(
        "{} workers done in {:?}: {} errors",
        config.workers,
        started.elapsed(),
        probe.errors()
    );
    Ok(())
}

fn worker<L: RawLock>(lock: &L, probe: &Probe, id: ParticipantId, config: &RaceConfig) {
    let tag = Probe::tag(id);
    for _ in 0..config.iterations {
        lock.acquire(id);
        probe.enter(id);
        config.busy_window.spin(|| probe.check(tag));
        lock.release(id);
    }
}
