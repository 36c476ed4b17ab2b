//! Error types returned by environment operations.

use core::fmt;

/// Opaque result code reported by a failing [`Platform`](crate::Platform) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformError(pub i32);

impl PlatformError {
    /// Returns the raw platform result code.
    pub const fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform error {}", self.0)
    }
}

/// The error type returned by fallible environment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EnvError {
    /// The init counter was misused (deinit without init, or a corrupted counter).
    InvalidState,
    /// The interrupt vector is not covered by the dispatch table.
    OutOfRange {
        /// The rejected vector.
        vector: usize,
        /// Number of vectors supported by the table.
        capacity: usize,
    },
    /// The heap could not satisfy an allocation request.
    AllocationFailure,
    /// The platform reported an error during init or deinit.
    Platform(PlatformError),
}

impl From<PlatformError> for EnvError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidState => write!(f, "invalid environment state"),
            EnvError::OutOfRange { vector, capacity } => {
                write!(f, "vector {} out of range (capacity {})", vector, capacity)
            }
            EnvError::AllocationFailure => write!(f, "memory allocation failed"),
            EnvError::Platform(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlatformError {}

#[cfg(feature = "std")]
impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::Platform(e) => Some(e),
            _ => None,
        }
    }
}
