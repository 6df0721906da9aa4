//! # Futex mutexes
//! Spinning is fine for short critical sections, for anything longer the waiting thread should sleep.
//! The kernel's futex gives exactly that: sleep while an atomic holds some value, wake whoever sleeps on it.
//!
//! Note that park and wake don't take any part in the memory consistency or correctness of a mutex.
//! They just spare us from wasting processor cycles. It's the state protocol that makes or breaks it:
//! - [`FetchAddMutex`] - a counter with a wrong expected value for the park. Broken on purpose
//! - [`CasMutex`] - 3 states, no syscalls when uncontended, no lost wake-ups
//!
//! Both take the queue as a parameter: [`Futex`] for the real kernel, [`InProcessQueue`] for tests.

mod cas;
mod fetch_add;
mod wait_queue;

pub use cas::CasMutex;
pub use fetch_add::FetchAddMutex;
pub use wait_queue::{Futex, InProcessQueue, WaitQueue};
