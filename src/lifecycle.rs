//! Reference-counted environment lifecycle.
//!
//! Several independent subsystems may each initialize and deinitialize the environment. Only
//! the first initialization actually sets the platform up, and only the last deinitialization
//! tears it down.

use spin::Mutex;

use crate::error::EnvError;

/// Counts the outstanding initializations of the environment.
///
/// The count is guarded by a spin lock that is also held while the setup and teardown
/// callbacks run, so an owner racing on another core never observes a half-initialized
/// platform. The lock is never waited on: an owner finding it held (another core in the
/// middle of setup, or an interrupt preempting the holder) fails with
/// [`EnvError::InvalidState`] instead of spinning.
#[derive(Debug)]
pub struct InitCounter {
    count: Mutex<i32>,
}

impl InitCounter {
    /// Creates a new counter with no outstanding initializations.
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(0),
        }
    }

    /// Returns the number of outstanding initializations.
    ///
    /// Waits for the counter lock, so it must only be called from the main context.
    pub fn count(&self) -> i32 {
        *self.count.lock()
    }

    /// Registers a new owner, running `setup` if this is the first one.
    ///
    /// Returns the result of `setup` on the 0 → 1 transition and `Ok(())` otherwise. The
    /// owner is counted even if `setup` fails, so it must still be balanced by a call to
    /// [`release`](Self::release). Fails with [`EnvError::InvalidState`], without counting
    /// the owner, if the counter is busy or saturated.
    pub fn acquire<F>(&self, setup: F) -> Result<(), EnvError>
    where
        F: FnOnce() -> Result<(), EnvError>,
    {
        let mut count = self.count.try_lock().ok_or(EnvError::InvalidState)?;

        debug_assert!(*count >= 0, "init counter underflow");
        if *count < 0 {
            return Err(EnvError::InvalidState);
        }

        *count = count.checked_add(1).ok_or(EnvError::InvalidState)?;
        if *count > 1 {
            return Ok(());
        }

        setup()
    }

    /// Unregisters an owner, running `teardown` if it was the last one.
    ///
    /// Fails with [`EnvError::InvalidState`] and leaves the counter untouched if there are no
    /// outstanding initializations or if the counter is busy.
    pub fn release<F>(&self, teardown: F) -> Result<(), EnvError>
    where
        F: FnOnce() -> Result<(), EnvError>,
    {
        let mut count = self.count.try_lock().ok_or(EnvError::InvalidState)?;

        if *count <= 0 {
            return Err(EnvError::InvalidState);
        }

        *count -= 1;
        if *count > 0 {
            return Ok(());
        }

        teardown()
    }
}

impl Default for InitCounter {
    fn default() -> Self {
        Self::new()
    }
}
