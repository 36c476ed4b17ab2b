use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use lazy_static::lazy_static;
use rpenv::{
    barrier,
    config::ISR_COUNT,
    mem::{self, MemBlock},
    EnvError, Environment, InterruptContext, MemFlags, NotifyTarget, PhysAddr, Platform,
    PlatformError, VirtAddr,
};

/// Shared memory carve-out, identity-mapped at a fixed offset.
const SHMEM_OFFSET: usize = 0x1000_0000;

#[derive(Debug)]
struct BoardPlatform {
    irqs_enabled: AtomicBool,
    vectors_enabled: AtomicUsize,
    inits: AtomicUsize,
    deinits: AtomicUsize,
    cache_enabled: AtomicBool,
}

impl BoardPlatform {
    const fn new() -> Self {
        Self {
            irqs_enabled: AtomicBool::new(true),
            vectors_enabled: AtomicUsize::new(0),
            inits: AtomicUsize::new(0),
            deinits: AtomicUsize::new(0),
            cache_enabled: AtomicBool::new(true),
        }
    }
}

impl Platform for BoardPlatform {
    fn init(&self) -> Result<(), PlatformError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn deinit(&self) -> Result<(), PlatformError> {
        self.deinits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn interrupt_disable_all(&self) {
        self.irqs_enabled.store(false, Ordering::SeqCst);
    }

    fn interrupt_enable_all(&self) {
        self.irqs_enabled.store(true, Ordering::SeqCst);
    }

    fn interrupt_enable(&self, vector: usize) {
        self.vectors_enabled.fetch_or(1 << vector, Ordering::SeqCst);
    }

    fn interrupt_disable(&self, vector: usize) {
        self.vectors_enabled.fetch_and(!(1 << vector), Ordering::SeqCst);
    }

    fn vatopa(&self, va: VirtAddr) -> PhysAddr {
        PhysAddr::new(va.as_usize() + SHMEM_OFFSET)
    }

    fn patova(&self, pa: PhysAddr) -> VirtAddr {
        VirtAddr::new(pa.as_usize() - SHMEM_OFFSET)
    }

    fn map_mem_region(&self, _va: VirtAddr, _pa: PhysAddr, _size: usize, _flags: MemFlags) {}

    fn cache_all_flush_invalidate(&self) {}

    fn cache_disable(&self) {
        self.cache_enabled.store(false, Ordering::SeqCst);
    }

    fn time_delay(&self, _msec: u32) {}

    fn in_isr(&self) -> bool {
        false
    }
}

/// Minimal stand-in for a transport virtqueue.
#[derive(Debug)]
struct Virtqueue {
    name: &'static str,
    pending: Mutex<Vec<u32>>,
    kicks: AtomicUsize,
}

impl Virtqueue {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: Mutex::new(Vec::new()),
            kicks: AtomicUsize::new(0),
        }
    }
}

impl NotifyTarget for Virtqueue {
    fn notify(&self) {
        self.kicks.fetch_add(1, Ordering::SeqCst);
    }
}

static ENV: Environment<BoardPlatform, Virtqueue> = Environment::new(BoardPlatform::new());

lazy_static! {
    static ref RX_VQ: Virtqueue = Virtqueue::new("rx");
    static ref TX_VQ: Virtqueue = Virtqueue::new("tx");
}

/// Simulates the remote core kicking `vector`.
fn remote_kick(env: &Environment<BoardPlatform, Virtqueue>, vector: usize) -> Result<(), EnvError> {
    // Masked interrupts stay pending until the main context unmasks them
    assert!(env.platform().irqs_enabled.load(Ordering::SeqCst));

    // SAFETY: stands in for the board's interrupt handler
    let ctx = unsafe { InterruptContext::new() };
    env.isr(&ctx, vector)
}

#[test]
fn transport_lifecycle() {
    // The transport and the name service both own the environment
    ENV.init().unwrap();
    ENV.init().unwrap();
    assert_eq!(ENV.platform().inits.load(Ordering::SeqCst), 1);

    let cs = ENV.create_mutex(1);
    ENV.with_lock(&cs, || {
        ENV.register_isr(0, &RX_VQ).unwrap();
        ENV.register_isr(1, &TX_VQ).unwrap();
    });
    ENV.enable_interrupt(0);
    ENV.enable_interrupt(1);
    assert_eq!(ENV.platform().vectors_enabled.load(Ordering::SeqCst), 0b11);

    remote_kick(&ENV, 0).unwrap();
    remote_kick(&ENV, 0).unwrap();
    remote_kick(&ENV, 1).unwrap();
    assert_eq!(RX_VQ.kicks.load(Ordering::SeqCst), 2);
    assert_eq!(TX_VQ.kicks.load(Ordering::SeqCst), 1);
    assert_eq!(ENV.isr_target(0).unwrap().map(|vq| vq.name), Some("rx"));

    // A vector beyond the table is dropped without notifying anyone
    assert!(remote_kick(&ENV, ISR_COUNT).is_err());
    assert_eq!(RX_VQ.kicks.load(Ordering::SeqCst), 2);
    assert_eq!(TX_VQ.kicks.load(Ordering::SeqCst), 1);

    // Shared ring state is only touched with interrupts masked
    ENV.lock_mutex(&cs);
    assert!(!ENV.platform().irqs_enabled.load(Ordering::SeqCst));
    RX_VQ.pending.lock().unwrap().push(42);
    barrier::wmb();
    ENV.unlock_mutex(&cs);
    assert_eq!(*RX_VQ.pending.lock().unwrap(), [42u32]);

    ENV.disable_interrupt(0);
    ENV.disable_interrupt(1);
    ENV.delete_mutex(cs);

    ENV.deinit().unwrap();
    assert_eq!(ENV.platform().deinits.load(Ordering::SeqCst), 0);
    ENV.deinit().unwrap();
    assert_eq!(ENV.platform().deinits.load(Ordering::SeqCst), 1);

    assert_eq!(ENV.deinit(), Err(EnvError::InvalidState));
    assert_eq!(ENV.init_count(), 0);
}

#[test]
fn shared_buffer_setup() {
    let env: Environment<BoardPlatform, Virtqueue> = Environment::new(BoardPlatform::new());
    env.init().unwrap();

    let mut block = mem::alloc_memory(32).expect("heap exhausted");
    let written = mem::strncpy(block.as_mut_slice(), b"rpmsg-openamp-demo-channel", 32);
    assert_eq!(written, 26);
    assert_eq!(mem::strlen(block.as_slice()), 26);
    assert_eq!(
        mem::strcmp(block.as_slice(), b"rpmsg-openamp-demo-channel"),
        std::cmp::Ordering::Equal
    );

    // The remote core sees the buffer through its physical address
    let va = VirtAddr::from_ptr(block.as_ptr());
    let pa = env.map_vatopa(va);
    assert_eq!(env.map_patova(pa), va);
    env.map_memory(pa, va, block.len(), MemFlags::SHARED | MemFlags::UNCACHED);
    barrier::mb();

    mem::free_memory(Some(block));
    mem::free_memory(None);
    assert_eq!(MemBlock::try_alloc(0).unwrap_err(), EnvError::AllocationFailure);

    env.disable_cache();
    assert!(!env.platform().cache_enabled.load(Ordering::SeqCst));

    env.deinit().unwrap();
}
