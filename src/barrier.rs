//! Memory barriers.
//!
//! All three barriers emit the same full fence. Separate entry points exist so callers can
//! state which ordering they rely on; targets with a weaker memory model may specialize them
//! later without touching callers.

use core::sync::atomic::{fence, Ordering};

/// Full memory barrier.
///
/// Every memory access issued before the barrier is ordered before every access issued
/// after it, as observed by any other agent sharing the memory (including a remote core).
#[inline]
pub fn mb() {
    fence(Ordering::SeqCst);
}

/// Read memory barrier.
#[inline]
pub fn rmb() {
    fence(Ordering::SeqCst);
}

/// Write memory barrier.
#[inline]
pub fn wmb() {
    fence(Ordering::SeqCst);
}
