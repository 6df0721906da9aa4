use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::kind::LockKind;

/// How long a worker keeps checking the flag while holding the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyWindow {
    /// wall-clock, re-reading the clock before every check
    Duration(Duration),
    /// a fixed number of checks, 0 => straight to release
    Spins(u64),
}

impl BusyWindow {
    /// The shortest timed window worth measuring.
    pub const MIN_NANOS: u64 = 10;

    pub fn from_nanos(nanos: u64) -> Self {
        Self::Duration(Duration::from_nanos(nanos.max(Self::MIN_NANOS)))
    }

    /// Calls `check` over and over till the window closes.
    #[inline]
    pub fn spin(&self, mut check: impl FnMut()) {
        match *self {
            Self::Duration(d) => {
                let end = Instant::now() + d;
                while Instant::now() < end {
                    check();
                }
            }
            Self::Spins(n) => (0..n).for_each(|_| check()),
        }
    }
}

impl Default for BusyWindow {
    fn default() -> Self {
        Self::Duration(Duration::from_micros(1))
    }
}

impl fmt::Display for BusyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Spins(n) => write!(f, "{n} checks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// per worker
    pub iterations: u64,
    pub busy_window: BusyWindow,
    pub workers: usize,
}

impl RaceConfig {
    pub const DEFAULT_WORKERS: usize = 2;

    pub fn for_kind(kind: LockKind) -> Self {
        Self {
            iterations: kind.default_iterations(),
            busy_window: BusyWindow::default(),
            workers: Self::DEFAULT_WORKERS,
        }
    }

    /// Builds the config from raw command-line values. Nothing here is fatal:
    /// - iterations: not a number or 0 => the lock's default
    /// - busy window in ns: not a number => the 1µs default, below [`BusyWindow::MIN_NANOS`] => clamped
    pub fn from_args(kind: LockKind, iterations: Option<&str>, busy_nanos: Option<&str>) -> Self {
        let mut config = Self::for_kind(kind);
        if let Some(n) = iterations.and_then(|s| s.trim().parse::<u64>().ok()) {
            if n != 0 {
                config.iterations = n;
            }
        }
        if let Some(ns) = busy_nanos.and_then(|s| s.trim().parse::<u64>().ok()) {
            config.busy_window = BusyWindow::from_nanos(ns);
        }
        config
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::for_kind(LockKind::TwoProcessCorrect)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.iterations, 10_000_000);
        assert_eq!(config.busy_window, BusyWindow::Duration(Duration::from_micros(1)));
        assert_eq!(config.workers, 2);
        assert_eq!(RaceConfig::for_kind(LockKind::FetchAddBroken).iterations, 1_000_000);
    }

    #[test]
    fn test_bad_args_fall_back() {
        let kind = LockKind::CasMutex;
        assert_eq!(RaceConfig::from_args(kind, Some("abc"), None), RaceConfig::for_kind(kind));
        assert_eq!(RaceConfig::from_args(kind, Some("0"), None).iterations, 10_000_000);
        assert_eq!(RaceConfig::from_args(kind, Some("-5"), None).iterations, 10_000_000);
        assert_eq!(
            RaceConfig::from_args(kind, Some("1000"), Some("x")).busy_window,
            BusyWindow::default()
        );
    }

    #[test]
    fn test_args() {
        let config = RaceConfig::from_args(LockKind::UnfairSpin, Some("1000000"), Some("250"));
        assert_eq!(config.iterations, 1_000_000);
        assert_eq!(config.busy_window, BusyWindow::Duration(Duration::from_nanos(250)));
    }

    #[test]
    fn test_busy_window_clamped() {
        assert_eq!(
            RaceConfig::from_args(LockKind::UnfairSpin, None, Some("3")).busy_window,
            BusyWindow::Duration(Duration::from_nanos(10))
        );
        assert_eq!(BusyWindow::from_nanos(0), BusyWindow::from_nanos(10));
    }

    #[test]
    fn test_spins() {
        let mut checks = 0;
        BusyWindow::Spins(5).spin(|| checks += 1);
        assert_eq!(checks, 5);

        checks = 0;
        BusyWindow::Spins(0).spin(|| checks += 1);
        assert_eq!(checks, 0);

        // a timed window checks until the clock says stop
        let started = Instant::now();
        BusyWindow::from_nanos(1_000_000).spin(|| {});
        assert!(started.elapsed() >= Duration::from_millis(1));
    }
}
