//! Interrupt-masking critical sections.
//!
//! Without a scheduler the only thing that can preempt the main context is an interrupt
//! handler, so masking interrupts is enough to protect shared virtqueue state. This is not a
//! lock: it never blocks, it does not count, and it has no identity. Every
//! [`CriticalSection`] maps onto the same global interrupt mask, so releasing any of them
//! unmasks interrupts for all of them. Critical sections must not be nested across distinct
//! tokens.

/// Handle to an interrupt-masking critical section.
///
/// The only state carried by the handle is whether it has been created. A default handle
/// is "unset" and compares unequal to any handle returned by
/// [`Environment::create_mutex`](crate::Environment::create_mutex).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CriticalSection {
    initialized: bool,
}

impl CriticalSection {
    /// Creates an initialized critical section handle.
    ///
    /// The initial count is accepted for interface compatibility with counting locks, but
    /// has no effect.
    pub const fn new(_count: i32) -> Self {
        Self { initialized: true }
    }

    /// Returns `true` if the handle has been created.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }
}
