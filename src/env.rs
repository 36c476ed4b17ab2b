//! The environment facade used by the virtqueue engine.

use core::fmt;

use crate::{
    addr::{PhysAddr, VirtAddr},
    config::ISR_COUNT,
    error::EnvError,
    isr::{InterruptContext, IsrTable, NotifyTarget},
    lifecycle::InitCounter,
    platform::{MemFlags, Platform},
    sync::CriticalSection,
};

/// Bare-metal environment for a virtqueue transport.
///
/// Owns the init counter and the interrupt dispatch table, and forwards every hardware
/// operation to the platform `P`. `T` is the notification target type, usually the
/// transport's virtqueue.
///
/// An environment is meant to live in a `static` and be shared by every subsystem that uses
/// the transport. Its state follows a single-writer discipline:
///
/// - the init counter is only touched from the main context, under its own spin lock,
/// - dispatch table slots are written from the main context and read from interrupt
///   context, through atomic pointers.
pub struct Environment<P, T: 'static> {
    platform: P,
    counter: InitCounter,
    isr_table: IsrTable<T, ISR_COUNT>,
}

impl<P, T: 'static> Environment<P, T> {
    /// Creates a new, uninitialized environment on top of `platform`.
    pub const fn new(platform: P) -> Self {
        Self {
            platform,
            counter: InitCounter::new(),
            isr_table: IsrTable::new(),
        }
    }

    /// Returns the underlying platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Returns the number of outstanding [`init`](Self::init) calls.
    pub fn init_count(&self) -> i32 {
        self.counter.count()
    }
}

impl<P: Platform, T: Sync + 'static> Environment<P, T> {
    /// Initializes the environment.
    ///
    /// The first call empties the dispatch table and initializes the platform, returning the
    /// platform's result. Later calls only register another owner and succeed immediately.
    /// Every call, including one whose platform initialization failed, must be balanced by a
    /// call to [`deinit`](Self::deinit).
    ///
    /// Fails with [`EnvError::InvalidState`] when called from interrupt context or while
    /// another owner is in the middle of initializing or deinitializing.
    pub fn init(&self) -> Result<(), EnvError> {
        if self.platform.in_isr() {
            kprintln!("env: init called from interrupt context");
            return Err(EnvError::InvalidState);
        }

        self.counter
            .acquire(|| {
                self.isr_table.clear();
                self.platform.init()?;
                kprintln!("env: platform initialized");
                Ok(())
            })
            .map_err(|e| {
                kprintln!("env: init failed: {}", e);
                e
            })
    }

    /// Deinitializes the environment.
    ///
    /// The platform is torn down when the last owner deinitializes. Fails with
    /// [`EnvError::InvalidState`] if the environment is not initialized, when called from
    /// interrupt context, or while another owner holds the init counter.
    pub fn deinit(&self) -> Result<(), EnvError> {
        if self.platform.in_isr() {
            kprintln!("env: deinit called from interrupt context");
            return Err(EnvError::InvalidState);
        }

        self.counter
            .release(|| {
                self.platform.deinit()?;
                kprintln!("env: platform deinitialized");
                Ok(())
            })
            .map_err(|e| {
                kprintln!("env: deinit failed: {}", e);
                e
            })
    }

    /// Returns `true` if the caller is running in interrupt context.
    #[inline]
    pub fn in_isr(&self) -> bool {
        self.platform.in_isr()
    }

    /// Creates a critical section handle. `count` is ignored.
    pub fn create_mutex(&self, count: i32) -> CriticalSection {
        CriticalSection::new(count)
    }

    /// Destroys a critical section handle. There is nothing to release.
    pub fn delete_mutex(&self, _cs: CriticalSection) {}

    /// Enters the critical section by masking all interrupts. Never blocks.
    #[inline]
    pub fn lock_mutex(&self, _cs: &CriticalSection) {
        self.platform.interrupt_disable_all();
    }

    /// Leaves the critical section by unmasking all interrupts.
    ///
    /// This unmasks interrupts even if another critical section is still open.
    #[inline]
    pub fn unlock_mutex(&self, _cs: &CriticalSection) {
        self.platform.interrupt_enable_all();
    }

    /// Runs `f` inside the critical section `cs`.
    pub fn with_lock<R>(&self, cs: &CriticalSection, f: impl FnOnce() -> R) -> R {
        self.lock_mutex(cs);
        let ret = f();
        self.unlock_mutex(cs);
        ret
    }

    /// Masks all interrupts.
    #[inline]
    pub fn disable_interrupts(&self) {
        self.platform.interrupt_disable_all();
    }

    /// Unmasks all interrupts.
    #[inline]
    pub fn restore_interrupts(&self) {
        self.platform.interrupt_enable_all();
    }

    /// Busy-waits for `msec` milliseconds.
    pub fn sleep_msec(&self, msec: u32) {
        self.platform.time_delay(msec);
    }

    /// Registers `target` to be notified when `vector` fires.
    ///
    /// Registration should happen with interrupts masked or before the vector is enabled.
    pub fn register_isr(&self, vector: usize, target: &'static T) -> Result<(), EnvError> {
        self.isr_table.register(vector, target).map_err(|e| {
            kprintln!("env: register_isr: {}", e);
            e
        })
    }

    /// Removes the target registered for `vector`, returning it.
    pub fn unregister_isr(&self, vector: usize) -> Result<Option<&'static T>, EnvError> {
        self.isr_table.unregister(vector).map_err(|e| {
            kprintln!("env: unregister_isr: {}", e);
            e
        })
    }

    /// Returns the target registered for `vector`, if any.
    pub fn isr_target(&self, vector: usize) -> Result<Option<&'static T>, EnvError> {
        self.isr_table.get(vector).map_err(|e| {
            kprintln!("env: isr_target: {}", e);
            e
        })
    }

    /// Unmasks the interrupt for `vector`.
    pub fn enable_interrupt(&self, vector: usize) {
        self.platform.interrupt_enable(vector);
    }

    /// Masks the interrupt for `vector`.
    pub fn disable_interrupt(&self, vector: usize) {
        self.platform.interrupt_disable(vector);
    }

    /// Translates a virtual address to a physical one.
    #[inline]
    pub fn map_vatopa(&self, va: VirtAddr) -> PhysAddr {
        self.platform.vatopa(va)
    }

    /// Translates a physical address to a virtual one.
    #[inline]
    pub fn map_patova(&self, pa: PhysAddr) -> VirtAddr {
        self.platform.patova(pa)
    }

    /// Asks the platform to map `size` bytes at `pa` to `va` with the given attributes.
    ///
    /// The platform does not report whether the mapping succeeded.
    pub fn map_memory(&self, pa: PhysAddr, va: VirtAddr, size: usize, flags: MemFlags) {
        self.platform.map_mem_region(va, pa, size, flags);
    }

    /// Flushes and invalidates the caches, then disables them for good.
    pub fn disable_cache(&self) {
        self.platform.cache_all_flush_invalidate();
        self.platform.cache_disable();
    }
}

impl<P: Platform, T: NotifyTarget + 'static> Environment<P, T> {
    /// Interrupt entry point: notifies the target registered for `vector`.
    ///
    /// Called by the platform's interrupt handler. An empty slot is silently ignored; an
    /// out-of-range vector notifies nobody and reports [`EnvError::OutOfRange`].
    pub fn isr(&self, ctx: &InterruptContext, vector: usize) -> Result<(), EnvError> {
        self.isr_table.dispatch(ctx, vector).map_err(|e| {
            kprintln!("env: isr: {}", e);
            e
        })
    }
}

impl<P: fmt::Debug, T: 'static> fmt::Debug for Environment<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("platform", &self.platform)
            .field("counter", &self.counter)
            .field("isr_table", &self.isr_table)
            .finish()
    }
}
