//! Board configuration, selected at build time through cargo features.
//!
//! - `config-dual-core` (default): one interrupt vector per remote core, two remote cores.
//! - `config-quad-core`: four interrupt vectors.

#[cfg(all(feature = "config-dual-core", feature = "config-quad-core"))]
compile_error!("Features \"config-dual-core\" and \"config-quad-core\" are mutually exclusive.");

#[cfg(not(any(feature = "config-dual-core", feature = "config-quad-core")))]
compile_error!("One of \"config-dual-core\" or \"config-quad-core\" must be enabled.");

#[cfg(feature = "config-dual-core")]
mod dual_core;
#[cfg(feature = "config-quad-core")]
mod quad_core;

#[cfg(feature = "config-dual-core")]
pub use dual_core::*;

#[cfg(feature = "config-quad-core")]
pub use quad_core::*;
