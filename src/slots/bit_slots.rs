use super::{CloneSlots, SlotStore};
use crate::error::{Error, Result};
use crate::utils::grower::{self, ElementWidth};
use bitvec::prelude::{BitSlice, Lsb0};
use bitvec::view::BitView;

/// Boolean slots packed one bit per element.
///
/// Capacity is tracked in bits; the backing block is rounded up to whole bytes.
/// Each element is exposed as a one-bit [`BitSlice`], so `slot(i)[0]` is the
/// value and `slot_mut(i).set(0, v)` updates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSlots {
    bytes: Vec<u8>,
    capacity: usize,
}

impl BitSlots {
    /// Allocates room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be nonzero"));
        }
        let mut bytes = Vec::new();
        grower::try_extend(
            &mut bytes,
            grower::storage_bytes(capacity, ElementWidth::Bits)?,
            || 0,
        )?;
        Ok(Self { bytes, capacity })
    }

    /// Number of bytes backing the bits.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    fn bits(&self) -> &BitSlice<u8, Lsb0> {
        &self.bytes.as_slice().view_bits::<Lsb0>()[..self.capacity]
    }

    #[inline(always)]
    fn bits_mut(&mut self) -> &mut BitSlice<u8, Lsb0> {
        let cap = self.capacity;
        &mut self.bytes.as_mut_slice().view_bits_mut::<Lsb0>()[..cap]
    }
}

impl SlotStore for BitSlots {
    type Elem = BitSlice<u8, Lsb0>;
    type Value = bool;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    fn element_width(&self) -> ElementWidth {
        ElementWidth::Bits
    }

    fn try_grow(&mut self, new_capacity: usize) -> Result<()> {
        let bytes = grower::storage_bytes(new_capacity, ElementWidth::Bits)?;
        grower::try_extend(&mut self.bytes, bytes, || 0)?;
        self.capacity = new_capacity;
        Ok(())
    }

    fn shrink(&mut self, new_capacity: usize) {
        self.bytes.truncate(new_capacity.div_ceil(8));
        self.bytes.shrink_to_fit();
        self.capacity = new_capacity;
    }

    fn fresh(&self, capacity: usize) -> Result<Self> {
        Self::with_capacity(capacity)
    }

    #[inline]
    fn shift(&mut self, src: usize, dst: usize, count: usize) {
        self.bits_mut().copy_within(src..src + count, dst);
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.bits_mut().swap(a, b);
    }

    fn rotate_left(&mut self, len: usize, mid: usize) {
        self.bits_mut()[..len].rotate_left(mid);
    }

    #[inline]
    fn write(&mut self, slot: usize, value: bool) {
        self.bits_mut().set(slot, value);
    }

    #[inline]
    unsafe fn take(&mut self, slot: usize) -> bool {
        self.bits()[slot]
    }

    #[inline]
    unsafe fn slot(&self, slot: usize) -> &BitSlice<u8, Lsb0> {
        &self.bits()[slot..=slot]
    }

    #[inline]
    unsafe fn slot_mut(&mut self, slot: usize) -> &mut BitSlice<u8, Lsb0> {
        &mut self.bits_mut()[slot..=slot]
    }
}

impl CloneSlots for BitSlots {
    unsafe fn value_of(&self, slot: usize) -> bool {
        self.bits()[slot]
    }
}
