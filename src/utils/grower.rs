//! Capacity growth policy shared by every container and slot backend.
//!
//! Growth doubles the slot count while it fits, then saturates at the largest
//! slot count addressable for the element width, and only then fails. Sizes are
//! bounded by `isize::MAX` bytes, the limit for any single Rust allocation.

use crate::error::{Error, Result};
use core::num::NonZeroUsize;

/// Largest byte count a single allocation may have.
pub const MAX_ALLOC_BYTES: usize = isize::MAX as usize;

/// Width of one element slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    /// Each element occupies this many bytes.
    Bytes(NonZeroUsize),
    /// Each element is a single bit; storage is rounded up to whole bytes.
    Bits,
}

impl ElementWidth {
    /// Builds a byte width, rejecting zero.
    pub fn bytes(n: usize) -> Result<Self> {
        NonZeroUsize::new(n)
            .map(ElementWidth::Bytes)
            .ok_or(Error::InvalidArgument("element size must be nonzero"))
    }

    /// Returns the byte width, or `None` for bit-packed slots.
    #[inline(always)]
    pub fn byte_size(self) -> Option<usize> {
        match self {
            ElementWidth::Bytes(n) => Some(n.get()),
            ElementWidth::Bits => None,
        }
    }

    /// Maximum number of slots whose storage stays within [`MAX_ALLOC_BYTES`].
    #[inline]
    pub fn max_slots(self) -> usize {
        match self {
            ElementWidth::Bytes(n) => MAX_ALLOC_BYTES / n.get(),
            // usize::MAX bits is usize::MAX / 8 + 1 bytes, below the limit.
            ElementWidth::Bits => usize::MAX,
        }
    }
}

/// Returns the capacity that follows `capacity` when a full container needs one
/// more slot.
///
/// # Errors
/// [`Error::RangeOverflow`] when `capacity` already is the maximum slot count.
pub fn next_capacity(capacity: usize, width: ElementWidth) -> Result<usize> {
    let max = width.max_slots();
    match capacity.checked_mul(2) {
        Some(doubled) if doubled <= max => Ok(doubled.max(1)),
        _ if capacity < max => Ok(max),
        _ => Err(Error::RangeOverflow),
    }
}

/// Applies [`next_capacity`] until the result holds at least `required` slots.
pub fn capacity_for(capacity: usize, required: usize, width: ElementWidth) -> Result<usize> {
    if required > width.max_slots() {
        return Err(Error::RangeOverflow);
    }
    let mut cap = capacity.max(1);
    while cap < required {
        cap = next_capacity(cap, width)?;
    }
    Ok(cap)
}

/// Number of storage bytes backing `capacity` slots.
pub fn storage_bytes(capacity: usize, width: ElementWidth) -> Result<usize> {
    let bytes = match width {
        ElementWidth::Bytes(n) => capacity.checked_mul(n.get()).ok_or(Error::RangeOverflow)?,
        ElementWidth::Bits => capacity.div_ceil(8),
    };
    if bytes > MAX_ALLOC_BYTES {
        return Err(Error::RangeOverflow);
    }
    Ok(bytes)
}

/// Extends `buf` to `new_len` elements produced by `fill`, leaving it untouched
/// if the allocator fails.
pub fn try_extend<T>(buf: &mut Vec<T>, new_len: usize, fill: impl FnMut() -> T) -> Result<()> {
    if new_len <= buf.len() {
        return Ok(());
    }
    buf.try_reserve_exact(new_len - buf.len())
        .map_err(|_| Error::OutOfMemory {
            bytes: new_len.saturating_mul(core::mem::size_of::<T>()),
        })?;
    buf.resize_with(new_len, fill);
    Ok(())
}
