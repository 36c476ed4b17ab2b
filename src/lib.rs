//! rpenv is the bare-metal environment layer underneath a virtqueue-based inter-core
//! messaging transport.
//!
//! It keeps the transport's ring-buffer logic independent from the target it runs on by
//! providing a small, fixed set of services:
//!
//! - a reference-counted init/deinit lifecycle that multiple independent owners can share,
//! - a critical section built on global interrupt masking (there is no scheduler to block on),
//! - a fixed-size table routing interrupt vectors to virtqueue notification targets,
//! - memory, barrier, address translation and cache primitives.
//!
//! Everything that actually touches the hardware is delegated to a [`Platform`] implementation
//! supplied by the board support code. The usual setup is a single `static` [`Environment`]:
//!
//! ```ignore
//! static ENV: Environment<BoardPlatform, Virtqueue> = Environment::new(BoardPlatform::new());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
// Keep things clean and tidy
#![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![deny(missing_debug_implementations)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[macro_use]
pub mod macros;

pub mod addr;
pub mod barrier;
pub mod config;
pub mod console;
pub mod env;
pub mod error;
pub mod isr;
pub mod lifecycle;
pub mod mem;
pub mod platform;
pub mod sync;

#[cfg(test)]
mod testing;

pub use addr::{PhysAddr, VirtAddr};
pub use env::Environment;
pub use error::{EnvError, PlatformError};
pub use isr::{InterruptContext, IsrTable, NotifyTarget};
pub use mem::MemBlock;
pub use platform::{MemFlags, Platform};
pub use sync::CriticalSection;
