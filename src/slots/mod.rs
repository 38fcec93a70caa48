//! Element storage backends.
//!
//! A [`SlotStore`] is one contiguous block of `capacity` fixed-width slots. The
//! containers in [`crate::vecs`] never touch element memory directly: they do the
//! index arithmetic and ask the store to move, swap, write or take whole slots.
//!
//! | Backend | Element | Storage |
//! |---------|---------|---------|
//! | [`ByteSlots`] | `[u8]` of a runtime width | `Vec<u8>` of `capacity * width` bytes |
//! | [`TypedSlots<T>`] | `T` (including owned `String`) | `Vec<MaybeUninit<T>>` |
//! | [`BitSlots`] | one bit | `Vec<u8>` of `ceil(capacity / 8)` bytes |
//!
//! # Slot liveness
//! The store does not track which slots hold live elements; the owning container
//! does. Methods that read a slot are therefore `unsafe`: callers promise the slot
//! is live. Moves (`shift`, `swap`, `rotate_left`) copy slot contents bit-for-bit
//! and are always sound; after a move the source slot is considered vacant.

use crate::error::Result;
use crate::utils::grower::ElementWidth;

mod bit_slots;
mod byte_slots;
mod typed_slots;

pub use bit_slots::BitSlots;
pub use byte_slots::ByteSlots;
pub use typed_slots::TypedSlots;

/// A growable block of fixed-width element slots.
pub trait SlotStore {
    /// Borrowed view of one element.
    type Elem: ?Sized;
    /// Owned element moved into and out of the store.
    type Value;
    /// `true` when vacating a live slot must run a destructor.
    const NEEDS_DROP: bool = false;

    /// Number of slots currently allocated.
    fn capacity(&self) -> usize;

    /// Width of each slot.
    fn element_width(&self) -> ElementWidth;

    /// Checks that `value` fits a slot. Called before any mutation.
    fn accepts(&self, _value: &Self::Value) -> Result<()> {
        Ok(())
    }

    /// Grows to `new_capacity` slots. Existing slots keep their indices.
    /// On failure the store is unchanged.
    fn try_grow(&mut self, new_capacity: usize) -> Result<()>;

    /// Releases every slot at or beyond `new_capacity`. Those slots must be vacant.
    fn shrink(&mut self, new_capacity: usize);

    /// Creates an empty store of the same width with `capacity` slots.
    fn fresh(&self, capacity: usize) -> Result<Self>
    where
        Self: Sized;

    /// Moves `count` slots starting at `src` to start at `dst`. Ranges may overlap.
    fn shift(&mut self, src: usize, dst: usize, count: usize);

    /// Exchanges the contents of two slots.
    fn swap(&mut self, a: usize, b: usize);

    /// Rotates slots `[0, len)` left by `mid`, so slot `mid` ends up at slot 0.
    fn rotate_left(&mut self, len: usize, mid: usize);

    /// Writes `value` into a vacant slot. The value must have passed [`accepts`](Self::accepts).
    fn write(&mut self, slot: usize, value: Self::Value);

    /// Moves the element out of `slot`, leaving it vacant.
    ///
    /// # Safety
    /// `slot` must hold a live element.
    unsafe fn take(&mut self, slot: usize) -> Self::Value;

    /// Borrows the element in `slot`.
    ///
    /// # Safety
    /// `slot` must hold a live element.
    unsafe fn slot(&self, slot: usize) -> &Self::Elem;

    /// Mutably borrows the element in `slot`.
    ///
    /// # Safety
    /// `slot` must hold a live element.
    unsafe fn slot_mut(&mut self, slot: usize) -> &mut Self::Elem;

    /// Drops the element in `slot` in place, leaving it vacant.
    ///
    /// # Safety
    /// `slot` must hold a live element.
    unsafe fn discard(&mut self, _slot: usize) {}
}

/// A store whose elements can be duplicated without a user callback.
pub trait CloneSlots: SlotStore {
    /// Returns an owned copy of the element in `slot`.
    ///
    /// # Safety
    /// `slot` must hold a live element.
    unsafe fn value_of(&self, slot: usize) -> Self::Value;
}
