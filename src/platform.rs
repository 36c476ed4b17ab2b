//! Interface to the board-specific platform layer.
//!
//! The environment does not touch hardware directly. Interrupt controllers, caches, MMU
//! tables and timers are all reached through a [`Platform`] implementation provided by the
//! board support code.

use bitflags::bitflags;

use crate::{
    addr::{PhysAddr, VirtAddr},
    error::PlatformError,
};

bitflags! {
    /// Cache and access attributes of a memory mapping.
    pub struct MemFlags: u32 {
        /// Non-cacheable memory.
        const UNCACHED       = 1 << 0;
        /// Write-back cacheable memory.
        const WB_CACHE       = 1 << 1;
        /// Write-through cacheable memory.
        const WT_CACHE       = 1 << 2;
        /// Strongly-ordered memory.
        const STRONG_ORDERED = 1 << 3;
        /// Device memory.
        const DEVICE         = 1 << 4;
        /// Memory shared with a remote core.
        const SHARED         = 1 << 5;
        /// Memory private to the local core.
        const LOCAL          = 1 << 6;
        /// Read-only access.
        const READ_ONLY      = 1 << 7;
    }
}

/// Hardware services required by the environment.
///
/// All methods take `&self`: a platform is shared between the main context and interrupt
/// handlers, so implementations must provide their own interior mutability where needed.
pub trait Platform: Sync {
    /// Performs one-time platform initialization.
    fn init(&self) -> Result<(), PlatformError>;

    /// Tears down the platform.
    fn deinit(&self) -> Result<(), PlatformError>;

    /// Masks all maskable interrupts on the current core.
    fn interrupt_disable_all(&self);

    /// Unmasks all maskable interrupts on the current core.
    fn interrupt_enable_all(&self);

    /// Unmasks the interrupt associated with `vector`.
    fn interrupt_enable(&self, vector: usize);

    /// Masks the interrupt associated with `vector`.
    fn interrupt_disable(&self, vector: usize);

    /// Translates a virtual address to its physical counterpart.
    fn vatopa(&self, va: VirtAddr) -> PhysAddr;

    /// Translates a physical address to its virtual counterpart.
    fn patova(&self, pa: PhysAddr) -> VirtAddr;

    /// Establishes a mapping of `size` bytes from `va` to `pa` with the given attributes.
    fn map_mem_region(&self, va: VirtAddr, pa: PhysAddr, size: usize, flags: MemFlags);

    /// Flushes and invalidates every cache line.
    fn cache_all_flush_invalidate(&self);

    /// Disables caching.
    fn cache_disable(&self);

    /// Busy-waits for `msec` milliseconds.
    fn time_delay(&self, msec: u32);

    /// Returns `true` if the caller is executing in interrupt context.
    fn in_isr(&self) -> bool;
}
