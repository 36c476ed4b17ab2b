//! Memory address types.
//!
//! Both types are wrappers around `usize`, so they are always pointer-sized. The environment
//! never interprets addresses itself: translation between the two spaces is left entirely to
//! the [`Platform`](crate::Platform).

use core::{
    fmt,
    ops::{Add, Sub},
};

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Creates a new address.
            pub const fn new(addr: usize) -> Self {
                Self(addr)
            }

            /// Returns the inner representation of the address.
            pub const fn as_usize(self) -> usize {
                self.0
            }

            /// Returns `true` if this is the null address.
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }

        impl From<usize> for $name {
            fn from(addr: usize) -> Self {
                Self(addr)
            }
        }

        impl From<$name> for usize {
            fn from(addr: $name) -> Self {
                addr.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.0)
            }
        }

        impl fmt::LowerHex for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl Add<usize> for $name {
            type Output = Self;

            fn add(self, rhs: usize) -> Self::Output {
                Self(self.0 + rhs)
            }
        }

        impl Sub<usize> for $name {
            type Output = Self;

            fn sub(self, rhs: usize) -> Self::Output {
                Self(self.0 - rhs)
            }
        }

        impl Sub for $name {
            type Output = usize;

            fn sub(self, rhs: Self) -> Self::Output {
                self.0 - rhs.0
            }
        }
    };
}

address_type! {
    /// A physical memory address, as seen by the remote core and by bus masters.
    PhysAddr
}

address_type! {
    /// A virtual memory address, as seen by the local core.
    VirtAddr
}

impl VirtAddr {
    /// Returns the virtual address of the object pointed to by `ptr`.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    /// Returns the address as a raw pointer.
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    /// Returns the address as a mutable raw pointer.
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}
