//! Test doubles shared by the unit tests.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
        Mutex,
    },
    vec::Vec,
};

use crate::{
    addr::{PhysAddr, VirtAddr},
    error::PlatformError,
    platform::{MemFlags, Platform},
};

/// Offset between the mock's virtual and physical address spaces.
pub const PHYS_OFFSET: usize = 0x8000_0000;

/// A platform call observed by [`MockPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Init,
    Deinit,
    MaskAll,
    UnmaskAll,
    Enable(usize),
    Disable(usize),
    Map(VirtAddr, PhysAddr, usize, MemFlags),
    FlushInvalidate,
    CacheDisable,
    Delay(u32),
}

/// Platform that records every call and keeps a software interrupt mask.
#[derive(Debug)]
pub struct MockPlatform {
    events: Mutex<Vec<Event>>,
    irqs_enabled: AtomicBool,
    in_isr: AtomicBool,
    init_code: AtomicI32,
    deinit_code: AtomicI32,
    inits: AtomicUsize,
    deinits: AtomicUsize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            irqs_enabled: AtomicBool::new(true),
            in_isr: AtomicBool::new(false),
            init_code: AtomicI32::new(0),
            deinit_code: AtomicI32::new(0),
            inits: AtomicUsize::new(0),
            deinits: AtomicUsize::new(0),
        }
    }

    /// Makes subsequent `init` calls fail with `code` (0 means success).
    pub fn fail_init_with(&self, code: i32) {
        self.init_code.store(code, Ordering::SeqCst);
    }

    /// Makes subsequent `deinit` calls fail with `code` (0 means success).
    pub fn fail_deinit_with(&self, code: i32) {
        self.deinit_code.store(code, Ordering::SeqCst);
    }

    pub fn set_in_isr(&self, in_isr: bool) {
        self.in_isr.store(in_isr, Ordering::SeqCst);
    }

    pub fn irqs_enabled(&self) -> bool {
        self.irqs_enabled.load(Ordering::SeqCst)
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn deinits(&self) -> usize {
        self.deinits.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn result(code: i32) -> Result<(), PlatformError> {
        if code == 0 {
            Ok(())
        } else {
            Err(PlatformError(code))
        }
    }
}

impl Platform for MockPlatform {
    fn init(&self) -> Result<(), PlatformError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.record(Event::Init);
        Self::result(self.init_code.load(Ordering::SeqCst))
    }

    fn deinit(&self) -> Result<(), PlatformError> {
        self.deinits.fetch_add(1, Ordering::SeqCst);
        self.record(Event::Deinit);
        Self::result(self.deinit_code.load(Ordering::SeqCst))
    }

    fn interrupt_disable_all(&self) {
        self.irqs_enabled.store(false, Ordering::SeqCst);
        self.record(Event::MaskAll);
    }

    fn interrupt_enable_all(&self) {
        self.irqs_enabled.store(true, Ordering::SeqCst);
        self.record(Event::UnmaskAll);
    }

    fn interrupt_enable(&self, vector: usize) {
        self.record(Event::Enable(vector));
    }

    fn interrupt_disable(&self, vector: usize) {
        self.record(Event::Disable(vector));
    }

    fn vatopa(&self, va: VirtAddr) -> PhysAddr {
        PhysAddr::new(va.as_usize().wrapping_add(PHYS_OFFSET))
    }

    fn patova(&self, pa: PhysAddr) -> VirtAddr {
        VirtAddr::new(pa.as_usize().wrapping_sub(PHYS_OFFSET))
    }

    fn map_mem_region(&self, va: VirtAddr, pa: PhysAddr, size: usize, flags: MemFlags) {
        self.record(Event::Map(va, pa, size, flags));
    }

    fn cache_all_flush_invalidate(&self) {
        self.record(Event::FlushInvalidate);
    }

    fn cache_disable(&self) {
        self.record(Event::CacheDisable);
    }

    fn time_delay(&self, msec: u32) {
        self.record(Event::Delay(msec));
    }

    fn in_isr(&self) -> bool {
        self.in_isr.load(Ordering::SeqCst)
    }
}
