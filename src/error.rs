//! Error types shared by every container in the crate.
//!
//! All fallible operations return [`Result`]; none of them retry internally.
//! Whether an error is also logged, or turns into a panic, is decided by the
//! container's [`ErrorPolicy`](crate::ErrorPolicy).

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Result returned by user callbacks (destructors, copiers, comparators, visitors).
pub type CallbackResult<T = ()> = core::result::Result<T, CallbackFailure>;

/// Errors returned by stack and queue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A zero element size or zero capacity was passed at construction, or two
    /// containers with incompatible layouts were combined.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The allocator refused to provide the requested block.
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },
    /// An index argument fell outside the valid range for the operation.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A user callback failed; elements before `index` were already processed.
    #[error("callback failed at index {index} with code {code}")]
    Callback { index: usize, code: i32 },
    /// The operation is not valid for the container's current state or layout.
    #[error("illegal operation: {0}")]
    IllegalOperation(IllegalOperation),
    /// An element count or byte size would exceed the addressable range.
    #[error("element count or storage size overflows the addressable range")]
    RangeOverflow,
}

/// The reason behind [`Error::IllegalOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IllegalOperation {
    /// Popping or peeking an empty container.
    #[error("container is empty")]
    Empty,
    /// An element of the wrong width was handed to a fixed-width container.
    #[error("element width mismatch: container holds {expected} bytes, got {found}")]
    WidthMismatch { expected: usize, found: usize },
}

impl From<IllegalOperation> for Error {
    fn from(op: IllegalOperation) -> Self {
        Error::IllegalOperation(op)
    }
}

/// Failure reported by a user callback.
///
/// The code is carried into [`Error::Callback`] unchanged. A code of zero is
/// promoted to `-1` so that a failure is never mistaken for success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("callback failure (code {code})")]
pub struct CallbackFailure {
    code: i32,
}

impl CallbackFailure {
    /// Creates a failure with the given nonzero code.
    pub const fn new(code: i32) -> Self {
        Self {
            code: if code == 0 { -1 } else { code },
        }
    }

    /// Returns the failure code.
    #[inline(always)]
    pub const fn code(self) -> i32 {
        self.code
    }

    pub(crate) fn at(self, index: usize) -> Error {
        Error::Callback {
            index,
            code: self.code,
        }
    }
}

impl Default for CallbackFailure {
    fn default() -> Self {
        Self::new(-1)
    }
}
