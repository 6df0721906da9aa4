//! # Memory barrier
//! A store followed by a load of a *different* location may be reordered by the CPU:
//! x86-64 keeps stores in a store buffer, ARM64 doesn't promise anything at all.
//! Acquire / Release don't help here, only a full barrier between the two does.
//!
//! `fence(SeqCst)` compiles down to exactly that:
//! - x86 / x86-64: `mfence`
//! - aarch64: `dmb ish`
//!
//! Other architectures aren't checked => the build fails there instead of
//! producing a binary nobody verified.

use std::sync::atomic::{fence, Ordering::SeqCst};

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("full memory barrier is not defined for this architecture");

/// Orders every memory access before the call against every one after it,
/// for both the compiler and the CPU.
#[inline(always)]
pub fn full_barrier() {
    fence(SeqCst);
}
