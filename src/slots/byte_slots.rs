use super::{CloneSlots, SlotStore};
use crate::error::{Error, IllegalOperation, Result};
use crate::utils::grower::{self, ElementWidth};
use core::num::NonZeroUsize;
use core::ops::Range;

/// Type-erased slots: every element is `element_size` raw bytes, copied in and
/// out by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSlots {
    bytes: Vec<u8>,
    element_size: NonZeroUsize,
    capacity: usize,
}

impl ByteSlots {
    /// Allocates `capacity` slots of `element_size` bytes each.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if either argument is zero,
    /// [`Error::RangeOverflow`] if the block would exceed the allocation limit,
    /// [`Error::OutOfMemory`] if the allocator fails.
    pub fn with_capacity(element_size: usize, capacity: usize) -> Result<Self> {
        let size = NonZeroUsize::new(element_size)
            .ok_or(Error::InvalidArgument("element size must be nonzero"))?;
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be nonzero"));
        }
        let mut bytes = Vec::new();
        let len = grower::storage_bytes(capacity, ElementWidth::Bytes(size))?;
        grower::try_extend(&mut bytes, len, || 0)?;
        Ok(Self {
            bytes,
            element_size: size,
            capacity,
        })
    }

    /// Width of one element in bytes.
    #[inline(always)]
    pub fn element_size(&self) -> usize {
        self.element_size.get()
    }

    /// The whole storage block, live and vacant slots alike.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    fn range(&self, slot: usize) -> Range<usize> {
        let start = slot * self.element_size.get();
        start..start + self.element_size.get()
    }
}

impl SlotStore for ByteSlots {
    type Elem = [u8];
    type Value = Vec<u8>;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    fn element_width(&self) -> ElementWidth {
        ElementWidth::Bytes(self.element_size)
    }

    fn accepts(&self, value: &Vec<u8>) -> Result<()> {
        if value.len() == self.element_size.get() {
            Ok(())
        } else {
            Err(IllegalOperation::WidthMismatch {
                expected: self.element_size.get(),
                found: value.len(),
            }
            .into())
        }
    }

    fn try_grow(&mut self, new_capacity: usize) -> Result<()> {
        let bytes = grower::storage_bytes(new_capacity, self.element_width())?;
        grower::try_extend(&mut self.bytes, bytes, || 0)?;
        self.capacity = new_capacity;
        Ok(())
    }

    fn shrink(&mut self, new_capacity: usize) {
        self.bytes.truncate(new_capacity * self.element_size.get());
        self.bytes.shrink_to_fit();
        self.capacity = new_capacity;
    }

    fn fresh(&self, capacity: usize) -> Result<Self> {
        Self::with_capacity(self.element_size.get(), capacity)
    }

    #[inline]
    fn shift(&mut self, src: usize, dst: usize, count: usize) {
        let w = self.element_size.get();
        self.bytes.copy_within(src * w..(src + count) * w, dst * w);
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let w = self.element_size.get();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (left, right) = self.bytes.split_at_mut(hi * w);
        left[lo * w..lo * w + w].swap_with_slice(&mut right[..w]);
    }

    fn rotate_left(&mut self, len: usize, mid: usize) {
        let w = self.element_size.get();
        self.bytes[..len * w].rotate_left(mid * w);
    }

    #[inline]
    fn write(&mut self, slot: usize, value: Vec<u8>) {
        let range = self.range(slot);
        self.bytes[range].copy_from_slice(&value);
    }

    #[inline]
    unsafe fn take(&mut self, slot: usize) -> Vec<u8> {
        self.bytes[self.range(slot)].to_vec()
    }

    #[inline]
    unsafe fn slot(&self, slot: usize) -> &[u8] {
        &self.bytes[self.range(slot)]
    }

    #[inline]
    unsafe fn slot_mut(&mut self, slot: usize) -> &mut [u8] {
        let range = self.range(slot);
        &mut self.bytes[range]
    }
}

impl CloneSlots for ByteSlots {
    unsafe fn value_of(&self, slot: usize) -> Vec<u8> {
        self.bytes[self.range(slot)].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: usize, cap: usize) -> ByteSlots {
        let mut s = ByteSlots::with_capacity(width, cap).unwrap();
        for i in 0..cap {
            s.write(i, vec![i as u8; width]);
        }
        s
    }

    #[test]
    fn test_byte_slots_rejects_zero_arguments() {
        assert!(matches!(
            ByteSlots::with_capacity(0, 4),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ByteSlots::with_capacity(4, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            ByteSlots::with_capacity(usize::MAX, 2),
            Err(Error::RangeOverflow)
        );
    }

    #[test]
    fn test_byte_slots_layout() {
        let s = filled(3, 4);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.element_size(), 3);
        assert_eq!(s.as_bytes().len(), 12);
        assert_eq!(unsafe { s.slot(2) }, &[2, 2, 2]);
    }

    #[test]
    fn test_byte_slots_accepts_checks_width() {
        let s = ByteSlots::with_capacity(4, 1).unwrap();
        assert!(s.accepts(&vec![0; 4]).is_ok());
        assert_eq!(
            s.accepts(&vec![0; 2]),
            Err(Error::IllegalOperation(IllegalOperation::WidthMismatch {
                expected: 4,
                found: 2
            }))
        );
    }

    #[test]
    fn test_byte_slots_moves() {
        let mut s = filled(2, 5);
        s.shift(0, 1, 3);
        assert_eq!(s.as_bytes(), &[0, 0, 0, 0, 1, 1, 2, 2, 4, 4]);
        s.swap(4, 0);
        assert_eq!(s.as_bytes(), &[4, 4, 0, 0, 1, 1, 2, 2, 0, 0]);
        s.rotate_left(4, 1);
        assert_eq!(s.as_bytes(), &[0, 0, 1, 1, 2, 2, 4, 4, 0, 0]);
    }

    #[test]
    fn test_byte_slots_grow_and_shrink() {
        let mut s = filled(2, 2);
        s.try_grow(6).unwrap();
        assert_eq!(s.capacity(), 6);
        assert_eq!(&s.as_bytes()[..4], &[0, 0, 1, 1]);
        s.shrink(3);
        assert_eq!(s.capacity(), 3);
        assert_eq!(s.as_bytes().len(), 6);
        assert_eq!(s.fresh(7).unwrap().capacity(), 7);
    }

    #[test]
    fn test_byte_slots_take_and_value_of() {
        let mut s = filled(2, 3);
        assert_eq!(unsafe { s.value_of(1) }, vec![1, 1]);
        let elem = unsafe { s.slot_mut(1) };
        elem[0] = 9;
        assert_eq!(unsafe { s.take(1) }, vec![9, 1]);
    }
}
