//! Interrupt vector dispatch.
//!
//! Each virtqueue registers itself against the interrupt vector the remote core uses to
//! kick it. When the platform takes that interrupt, it enters the environment through
//! [`Environment::isr`](crate::Environment::isr), which looks up the table and notifies the
//! registered virtqueue.
//!
//! The table only holds non-owning `&'static` back-references. Slots are atomic pointers, so
//! an interrupt handler never observes a torn registration, even if the main context
//! registers with interrupts enabled.

use core::{
    fmt,
    marker::PhantomData,
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};

use crate::error::EnvError;

/// Receiver of interrupt notifications, usually a virtqueue.
pub trait NotifyTarget: Sync {
    /// Handles a notification for the vector this target is registered against.
    fn notify(&self);
}

/// Proof that the holder is running in interrupt context.
///
/// Dispatch is a separate concurrency domain from the main context: it may run at any
/// instruction boundary where interrupts are unmasked, regardless of what the main context
/// believes it holds. Requiring this token keeps ordinary code from calling into the
/// dispatch path by accident.
#[derive(Debug)]
pub struct InterruptContext {
    // Interrupt context is tied to the core that took the interrupt.
    _not_send: PhantomData<*const ()>,
}

impl InterruptContext {
    /// Creates a new interrupt context token.
    ///
    /// # Safety
    ///
    /// Must only be called from the platform's interrupt handler, and the token must not
    /// outlive that handler.
    pub unsafe fn new() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

/// Fixed-capacity table mapping interrupt vectors to notification targets.
pub struct IsrTable<T: 'static, const N: usize> {
    slots: [AtomicPtr<T>; N],
}

impl<T: 'static, const N: usize> IsrTable<T, N> {
    const EMPTY: AtomicPtr<T> = AtomicPtr::new(ptr::null_mut());

    /// Creates a new table with every slot empty.
    pub const fn new() -> Self {
        Self {
            slots: [Self::EMPTY; N],
        }
    }

    /// Returns the number of vectors covered by the table.
    pub const fn capacity(&self) -> usize {
        N
    }

    fn slot(&self, vector: usize) -> Result<&AtomicPtr<T>, EnvError> {
        self.slots.get(vector).ok_or(EnvError::OutOfRange {
            vector,
            capacity: N,
        })
    }

    /// Empties every slot.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.store(ptr::null_mut(), Ordering::Release);
        }
    }
}

impl<T: Sync + 'static, const N: usize> IsrTable<T, N> {
    /// Registers `target` for `vector`, replacing any previous registration.
    ///
    /// Fails with [`EnvError::OutOfRange`] without modifying the table if `vector` is not
    /// covered by the table.
    pub fn register(&self, vector: usize, target: &'static T) -> Result<(), EnvError> {
        self.slot(vector)?
            .store(target as *const T as *mut T, Ordering::Release);
        Ok(())
    }

    /// Removes the registration for `vector`, returning the previous target.
    pub fn unregister(&self, vector: usize) -> Result<Option<&'static T>, EnvError> {
        let old = self.slot(vector)?.swap(ptr::null_mut(), Ordering::AcqRel);

        // SAFETY: non-null slots only ever hold pointers obtained from a `&'static T`
        Ok(unsafe { old.as_ref() })
    }

    /// Returns the target registered for `vector`, if any.
    pub fn get(&self, vector: usize) -> Result<Option<&'static T>, EnvError> {
        let target = self.slot(vector)?.load(Ordering::Acquire);

        // SAFETY: non-null slots only ever hold pointers obtained from a `&'static T`
        Ok(unsafe { target.as_ref() })
    }
}

impl<T: NotifyTarget + 'static, const N: usize> IsrTable<T, N> {
    /// Notifies the target registered for `vector`.
    ///
    /// An empty slot is not an error: the interrupt is simply dropped. An out-of-range vector
    /// fails with [`EnvError::OutOfRange`] without notifying anyone.
    pub fn dispatch(&self, _ctx: &InterruptContext, vector: usize) -> Result<(), EnvError> {
        if let Some(target) = self.get(vector)? {
            target.notify();
        }
        Ok(())
    }
}

impl<T: 'static, const N: usize> Default for IsrTable<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static, const N: usize> fmt::Debug for IsrTable<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| s.load(Ordering::Relaxed)))
            .finish()
    }
}
