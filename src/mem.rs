//! Heap and byte-string primitives used by the virtqueue engine.
//!
//! The string helpers follow C semantics on byte slices: a string ends at its first NUL
//! byte, and the end of a slice counts as a NUL.

use core::{
    alloc::Layout,
    cmp::{self, Ordering},
    fmt,
    ptr::NonNull,
    slice,
};

use alloc::alloc::{alloc_zeroed, dealloc};

use crate::error::EnvError;

/// Alignment of every block returned by [`alloc_memory`], suitable for any primitive type.
pub const MEM_ALIGN: usize = 2 * core::mem::size_of::<usize>();

/// A heap block owned by the caller.
///
/// The block is released when dropped, or explicitly through [`free_memory`].
pub struct MemBlock {
    ptr: NonNull<u8>,
    size: usize,
}

// SAFETY: `MemBlock` uniquely owns its allocation
unsafe impl Send for MemBlock {}
// SAFETY: shared access only hands out shared slices
unsafe impl Sync for MemBlock {}

impl MemBlock {
    /// Allocates a zero-filled block of `size` bytes.
    ///
    /// Zero-sized requests and heap exhaustion both fail with
    /// [`EnvError::AllocationFailure`].
    pub fn try_alloc(size: usize) -> Result<Self, EnvError> {
        if size == 0 {
            return Err(EnvError::AllocationFailure);
        }

        let layout =
            Layout::from_size_align(size, MEM_ALIGN).map_err(|_| EnvError::AllocationFailure)?;

        // SAFETY: `layout` has a non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };

        NonNull::new(ptr)
            .map(|ptr| Self { ptr, size })
            .ok_or(EnvError::AllocationFailure)
    }

    /// Returns a raw pointer to the block.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns a mutable raw pointer to the block.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns the size of the block in bytes.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `false`: zero-sized blocks are never handed out.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the content of the block.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the block holds `size` initialized bytes
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// Returns the content of the block for writing.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: the block holds `size` initialized bytes, and we hold `&mut self`
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for MemBlock {
    fn drop(&mut self) {
        // SAFETY: the block was allocated with exactly this layout in `try_alloc`
        unsafe {
            dealloc(
                self.ptr.as_ptr(),
                Layout::from_size_align_unchecked(self.size, MEM_ALIGN),
            )
        };
    }
}

impl fmt::Debug for MemBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemBlock")
            .field("ptr", &self.ptr)
            .field("size", &self.size)
            .finish()
    }
}

/// Allocates a zero-filled block of `size` bytes.
///
/// Returns `None` if the heap is exhausted. A request for zero bytes always returns `None`.
pub fn alloc_memory(size: usize) -> Option<MemBlock> {
    MemBlock::try_alloc(size).ok()
}

/// Releases a block obtained from [`alloc_memory`]. Releasing `None` does nothing.
pub fn free_memory(block: Option<MemBlock>) {
    drop(block);
}

/// Fills the first `len` bytes of `dst` with `value`.
///
/// # Panics
///
/// Panics if `len` exceeds the length of `dst`.
pub fn memset(dst: &mut [u8], value: u8, len: usize) {
    dst[..len].fill(value);
}

/// Copies the first `len` bytes of `src` into `dst`.
///
/// # Panics
///
/// Panics if `len` exceeds the length of either slice.
pub fn memcpy(dst: &mut [u8], src: &[u8], len: usize) {
    dst[..len].copy_from_slice(&src[..len]);
}

/// Returns the length of the string in `s`, excluding the terminator.
pub fn strlen(s: &[u8]) -> usize {
    s.iter().position(|&c| c == 0).unwrap_or(s.len())
}

/// Compares two strings.
pub fn strcmp(s1: &[u8], s2: &[u8]) -> Ordering {
    strncmp(s1, s2, usize::MAX)
}

/// Compares at most `len` bytes of two strings.
pub fn strncmp(s1: &[u8], s2: &[u8], len: usize) -> Ordering {
    for i in 0..len {
        let c1 = s1.get(i).copied().unwrap_or(0);
        let c2 = s2.get(i).copied().unwrap_or(0);

        if c1 != c2 {
            return c1.cmp(&c2);
        }
        if c1 == 0 {
            break;
        }
    }

    Ordering::Equal
}

/// Copies at most `len` bytes of the string in `src` into `dst`.
///
/// Only the bytes `src` actually provides are written: the string itself and, if `src`
/// contains one within the first `len` bytes, its NUL terminator. The rest of `dst` is left
/// untouched, so the result is not terminated when `src` is `len` bytes or longer.
///
/// Returns the number of bytes written.
///
/// # Panics
///
/// Panics if `dst` is shorter than the number of bytes to write.
pub fn strncpy(dst: &mut [u8], src: &[u8], len: usize) -> usize {
    let n = match src.iter().position(|&c| c == 0) {
        Some(nul) => cmp::min(len, nul + 1),
        None => cmp::min(len, src.len()),
    };

    dst[..n].copy_from_slice(&src[..n]);
    n
}
