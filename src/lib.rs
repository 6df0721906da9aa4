pub mod barrier;
pub mod futex;
pub mod kind;
pub mod race;
pub mod raw_lock;
pub mod reference;
pub mod spin;
pub mod two_process;

pub use kind::{AnyLock, LockKind};
pub use race::{race, BusyWindow, RaceConfig, RaceError, RaceReport};
pub use raw_lock::{LockGuard, ParticipantId, RawLock};
