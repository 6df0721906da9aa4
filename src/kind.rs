//! # Lock kinds
//! Every lock in the crate under one tag, so the harness, the binary and the tests can pick one by value.
//! Broken ones are separate variants, never a flag on a correct one.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::futex::{CasMutex, FetchAddMutex};
use crate::raw_lock::{ParticipantId, RawLock};
use crate::reference::ReferenceMutex;
use crate::spin::UnfairSpinLock;
use crate::two_process::{BrokenPetersonLock, PetersonLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LockKind {
    TwoProcessCorrect,
    TwoProcessBroken,
    FetchAddBroken,
    CasMutex,
    UnfairSpin,
    Reference,
}

impl LockKind {
    /// Wrong on purpose: expected to fail the race check sooner or later.
    pub fn is_broken(self) -> bool {
        matches!(self, Self::TwoProcessBroken | Self::FetchAddBroken)
    }

    /// Only the spinning ones never put a thread to sleep.
    pub fn may_park(self) -> bool {
        matches!(self, Self::FetchAddBroken | Self::CasMutex | Self::Reference)
    }

    pub fn default_iterations(self) -> u64 {
        match self {
            // everybody re-increments the counter all the time => slow
            Self::FetchAddBroken => 1_000_000,
            _ => 10_000_000,
        }
    }
}

/// One lock of any [`LockKind`], dispatching by match.
pub enum AnyLock {
    TwoProcessCorrect(PetersonLock),
    TwoProcessBroken(BrokenPetersonLock),
    FetchAddBroken(FetchAddMutex),
    CasMutex(CasMutex),
    UnfairSpin(UnfairSpinLock),
    Reference(ReferenceMutex),
}

impl AnyLock {
    pub const fn new(kind: LockKind) -> Self {
        match kind {
            LockKind::TwoProcessCorrect => Self::TwoProcessCorrect(PetersonLock::new()),
            LockKind::TwoProcessBroken => Self::TwoProcessBroken(BrokenPetersonLock::new()),
            LockKind::FetchAddBroken => Self::FetchAddBroken(FetchAddMutex::new()),
            LockKind::CasMutex => Self::CasMutex(CasMutex::new()),
            LockKind::UnfairSpin => Self::UnfairSpin(UnfairSpinLock::new()),
            LockKind::Reference => Self::Reference(ReferenceMutex::new()),
        }
    }

    pub fn kind(&self) -> LockKind {
        match self {
            Self::TwoProcessCorrect(_) => LockKind::TwoProcessCorrect,
            Self::TwoProcessBroken(_) => LockKind::TwoProcessBroken,
            Self::FetchAddBroken(_) => LockKind::FetchAddBroken,
            Self::CasMutex(_) => LockKind::CasMutex,
            Self::UnfairSpin(_) => LockKind::UnfairSpin,
            Self::Reference(_) => LockKind::Reference,
        }
    }

    fn inner(&self) -> &dyn RawLock {
        match self {
            Self::TwoProcessCorrect(l) => l,
            Self::TwoProcessBroken(l) => l,
            Self::FetchAddBroken(l) => l,
            Self::CasMutex(l) => l,
            Self::UnfairSpin(l) => l,
            Self::Reference(l) => l,
        }
    }
}

impl From<LockKind> for AnyLock {
    fn from(kind: LockKind) -> Self {
        Self::new(kind)
    }
}

impl RawLock for AnyLock {
    fn acquire(&self, id: ParticipantId) {
        self.inner().acquire(id)
    }

    fn release(&self, id: ParticipantId) {
        self.inner().release(id)
    }

    fn is_locked(&self) -> bool {
        self.inner().is_locked()
    }

    fn capacity(&self) -> Option<usize> {
        self.inner().capacity()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names() {
        assert_eq!(LockKind::TwoProcessCorrect.to_string(), "two_process_correct");
        assert_eq!(LockKind::from_str("cas_mutex").unwrap(), LockKind::CasMutex);
        assert!(LockKind::from_str("cas").is_err());
        let name: &'static str = LockKind::FetchAddBroken.into();
        assert_eq!(name, "fetch_add_broken");
    }

    #[test]
    fn test_round_trip_every_kind() {
        for kind in LockKind::iter() {
            let lock = AnyLock::new(kind);
            assert_eq!(lock.kind(), kind);
            assert!(!lock.is_locked(), "{kind} starts locked");
            lock.acquire(0);
            assert!(lock.is_locked(), "{kind} isn't locked after acquire");
            lock.release(0);
            assert!(!lock.is_locked(), "{kind} stays locked after release");
        }
    }

    #[test]
    fn test_capacity() {
        for kind in LockKind::iter() {
            let expected = match kind {
                LockKind::TwoProcessCorrect | LockKind::TwoProcessBroken => Some(2),
                _ => None,
            };
            assert_eq!(AnyLock::from(kind).capacity(), expected, "{kind}");
        }
    }

    #[test]
    fn test_broken_ones_are_labelled() {
        let broken: Vec<_> = LockKind::iter().filter(|k| k.is_broken()).collect();
        assert_eq!(broken, [LockKind::TwoProcessBroken, LockKind::FetchAddBroken]);
        assert!(!LockKind::TwoProcessCorrect.may_park());
        assert!(LockKind::CasMutex.may_park());
    }

    proptest! {
        // any uncontended sequence of lock / unlock leaves every lock as it found it
        #[test]
        fn test_uncontended_sequences(ids in proptest::collection::vec(0usize..2, 1..64)) {
            let peterson = PetersonLock::new();
            let broken = BrokenPetersonLock::new();
            let fetch_add = FetchAddMutex::new();
            let cas = CasMutex::new();
            let spin = UnfairSpinLock::new();
            for &id in &ids {
                for lock in [&peterson as &dyn RawLock, &broken, &fetch_add, &cas, &spin] {
                    lock.acquire(id);
                    prop_assert!(lock.is_locked());
                    lock.release(id);
                    prop_assert!(!lock.is_locked());
                }
            }
            prop_assert_eq!(fetch_add.state(), 0);
            prop_assert_eq!(cas.state(), 0);
            prop_assert_eq!(spin.state(), 0);
            let last = *ids.last().unwrap();
            prop_assert_eq!(peterson.state().wants_to_enter, [false, false]);
            prop_assert_eq!(peterson.state().looser, last);
            prop_assert_eq!(broken.state(), peterson.state());
        }
    }
}
