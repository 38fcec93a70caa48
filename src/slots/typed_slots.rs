use super::{CloneSlots, SlotStore};
use crate::error::{Error, Result};
use crate::utils::grower::{self, ElementWidth};
use core::fmt;
use core::mem::{self, MaybeUninit};
use core::num::NonZeroUsize;
use core::ptr;

/// Slots holding values of a concrete type `T`.
///
/// Owned values (for example `String`) live directly in their slot and are
/// dropped by the container that owns the store, so no destructor callback is
/// needed to release them.
pub struct TypedSlots<T> {
    buf: Vec<MaybeUninit<T>>,
    width: NonZeroUsize,
}

impl<T> TypedSlots<T> {
    /// Allocates `capacity` uninitialized slots.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] for a zero capacity or a zero-sized `T`
    /// (use [`BitSlots`](super::BitSlots) for flags).
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let width = NonZeroUsize::new(mem::size_of::<T>())
            .ok_or(Error::InvalidArgument("zero-sized element types are not supported"))?;
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be nonzero"));
        }
        grower::storage_bytes(capacity, ElementWidth::Bytes(width))?;
        let mut buf = Vec::new();
        grower::try_extend(&mut buf, capacity, MaybeUninit::uninit)?;
        Ok(Self { buf, width })
    }
}

impl<T> SlotStore for TypedSlots<T> {
    type Elem = T;
    type Value = T;
    const NEEDS_DROP: bool = mem::needs_drop::<T>();

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    fn element_width(&self) -> ElementWidth {
        ElementWidth::Bytes(self.width)
    }

    fn try_grow(&mut self, new_capacity: usize) -> Result<()> {
        grower::storage_bytes(new_capacity, self.element_width())?;
        grower::try_extend(&mut self.buf, new_capacity, MaybeUninit::uninit)
    }

    fn shrink(&mut self, new_capacity: usize) {
        // MaybeUninit has no drop glue: truncating never drops a value.
        self.buf.truncate(new_capacity);
        self.buf.shrink_to_fit();
    }

    fn fresh(&self, capacity: usize) -> Result<Self> {
        Self::with_capacity(capacity)
    }

    #[inline]
    fn shift(&mut self, src: usize, dst: usize, count: usize) {
        let cap = self.buf.len();
        assert!(
            src <= cap && dst <= cap && count <= cap - src.max(dst),
            "slot shift out of bounds"
        );
        // SAFETY: both ranges were checked to lie inside `buf`; `ptr::copy`
        // permits overlap, and moving `MaybeUninit` bits is always sound.
        unsafe {
            let base = self.buf.as_mut_ptr();
            ptr::copy(base.add(src), base.add(dst), count);
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.buf.swap(a, b);
    }

    fn rotate_left(&mut self, len: usize, mid: usize) {
        self.buf[..len].rotate_left(mid);
    }

    #[inline]
    fn write(&mut self, slot: usize, value: T) {
        self.buf[slot] = MaybeUninit::new(value);
    }

    #[inline]
    unsafe fn take(&mut self, slot: usize) -> T {
        // SAFETY: the caller guarantees `slot` is live.
        unsafe { self.buf[slot].assume_init_read() }
    }

    #[inline]
    unsafe fn slot(&self, slot: usize) -> &T {
        // SAFETY: the caller guarantees `slot` is live.
        unsafe { self.buf[slot].assume_init_ref() }
    }

    #[inline]
    unsafe fn slot_mut(&mut self, slot: usize) -> &mut T {
        // SAFETY: the caller guarantees `slot` is live.
        unsafe { self.buf[slot].assume_init_mut() }
    }

    #[inline]
    unsafe fn discard(&mut self, slot: usize) {
        // SAFETY: the caller guarantees `slot` is live.
        unsafe { self.buf[slot].assume_init_drop() }
    }
}

impl<T: Clone> CloneSlots for TypedSlots<T> {
    unsafe fn value_of(&self, slot: usize) -> T {
        // SAFETY: forwarded caller guarantee.
        unsafe { self.slot(slot) }.clone()
    }
}

impl<T> fmt::Debug for TypedSlots<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSlots")
            .field("capacity", &self.buf.len())
            .field("width", &self.width)
            .finish()
    }
}
