//! Growable FIFO queue over a ring buffer.
//!
//! [`RingQueue`] keeps two slot cursors, `head` (front) and `tail` (back), over a
//! single [`SlotStore`] block. The live region may wrap past the physical end of
//! the block back to slot 0.
//!
//! # Growth
//! When the queue is full the block grows through the shared grower. If the live
//! region was wrapped, the wrapped prefix `[0, tail]` is copied into the freshly
//! added slots right after the old physical end, so the region is linear again
//! and `head` keeps its slot. If saturation left too little room for that copy,
//! the old region is rotated so `head` lands on slot 0 instead.
//!
//! # Interior insert / remove
//! Ordered [`insert`](RingQueue::insert) and [`remove`](RingQueue::remove) shift
//! whichever side of the target index holds fewer elements, so their cost is
//! `O(min(index, len - index))`. The quick variants swap with the tail instead and
//! do not preserve order.
//!
//! # Example
//! ```
//! use ringstack::TypedQueue;
//!
//! let mut q: TypedQueue<u32> = TypedQueue::new(2).unwrap();
//! q.push(1).unwrap();
//! q.push(2).unwrap();
//! q.push(3).unwrap(); // grows to 4
//! q.insert(1, 9).unwrap();
//! assert_eq!(q.iter().copied().collect::<Vec<_>>(), [1, 9, 2, 3]);
//! assert_eq!(q.pop(), Ok(1));
//! ```

use crate::config::Config;
use crate::error::{CallbackResult, Error, IllegalOperation, Result};
use crate::slots::{BitSlots, ByteSlots, CloneSlots, SlotStore, TypedSlots};
use crate::utils::grower::{self, ElementWidth};
use core::fmt;
use core::iter::FusedIterator;

/// A growable FIFO queue over a circular block of slots.
///
/// See the [module documentation](self) for the growth and shifting rules.
pub struct RingQueue<S: SlotStore> {
    slots: S,
    head: usize,
    /// Last live slot; one step behind `head` while the queue is empty.
    tail: usize,
    len: usize,
    config: Config,
}

/// Queue of raw byte records whose width is chosen at runtime.
pub type ByteQueue = RingQueue<ByteSlots>;
/// Queue of typed values.
pub type TypedQueue<T> = RingQueue<TypedSlots<T>>;
/// Queue of owned strings.
pub type StrQueue = TypedQueue<String>;
/// Queue of booleans packed one bit per element.
pub type BitQueue = RingQueue<BitSlots>;

impl RingQueue<ByteSlots> {
    /// Creates an empty queue of `capacity` records, each `element_size` bytes.
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Self::with_config(element_size, capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(element_size: usize, capacity: usize, config: Config) -> Result<Self> {
        let slots = ByteSlots::with_capacity(element_size, capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl<T> RingQueue<TypedSlots<T>> {
    /// Creates an empty queue with room for `capacity` values.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(capacity: usize, config: Config) -> Result<Self> {
        let slots = TypedSlots::with_capacity(capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl RingQueue<BitSlots> {
    /// Creates an empty queue with room for `capacity` bits.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(capacity: usize, config: Config) -> Result<Self> {
        let slots = BitSlots::with_capacity(capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl<S: SlotStore> RingQueue<S> {
    /// Wraps an empty slot store. Every slot is treated as vacant.
    pub fn from_slots(slots: S, config: Config) -> Result<Self> {
        let capacity = slots.capacity();
        if capacity == 0 {
            return config.fail(Error::InvalidArgument("capacity must be nonzero"));
        }
        Ok(Self {
            slots,
            head: 0,
            tail: capacity - 1,
            len: 0,
            config,
        })
    }

    // ─── Inspection ───────────────────────────────────────────────────────────

    /// Number of live elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Width of each element.
    #[inline(always)]
    pub fn element_width(&self) -> ElementWidth {
        self.slots.element_width()
    }

    /// The configuration chosen at construction.
    #[inline(always)]
    pub fn config(&self) -> Config {
        self.config
    }

    /// The underlying slot store.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Physical slot of the front element.
    #[inline(always)]
    pub fn head_slot(&self) -> usize {
        self.head
    }

    /// Physical slot of the back element (one behind the head when empty).
    #[inline(always)]
    pub fn tail_slot(&self) -> usize {
        self.tail
    }

    // ─── Ring arithmetic ──────────────────────────────────────────────────────

    /// One slot forward, wrapping past the last slot to slot 0.
    #[inline(always)]
    fn advance(&self, slot: usize) -> usize {
        if slot + 1 == self.slots.capacity() {
            0
        } else {
            slot + 1
        }
    }

    /// One slot backward, wrapping from slot 0 to the last slot.
    #[inline(always)]
    fn retreat(&self, slot: usize) -> usize {
        if slot == 0 {
            self.slots.capacity() - 1
        } else {
            slot - 1
        }
    }

    /// Maps a logical index to its physical slot in one hop.
    #[inline(always)]
    fn physical(&self, index: usize) -> usize {
        let slots_ahead = self.slots.capacity() - self.head;
        if index < slots_ahead {
            self.head + index
        } else {
            index - slots_ahead
        }
    }

    // ─── Validation ───────────────────────────────────────────────────────────

    #[inline(always)]
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            self.config.fail(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    #[inline(always)]
    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index <= self.len {
            Ok(())
        } else {
            self.config.fail(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    #[inline(always)]
    fn check_non_empty(&self) -> Result<()> {
        if self.len > 0 {
            Ok(())
        } else {
            self.config.fail(IllegalOperation::Empty.into())
        }
    }

    #[inline(always)]
    fn check_value(&self, value: &S::Value) -> Result<()> {
        self.slots.accepts(value).map_err(|e| self.config.raise(e))
    }

    // ─── Growth ───────────────────────────────────────────────────────────────

    /// Makes room for one more element if the queue is full.
    #[inline(always)]
    fn reserve_one(&mut self) -> Result<()> {
        if self.len < self.slots.capacity() {
            return Ok(());
        }
        let next = grower::next_capacity(self.slots.capacity(), self.element_width())
            .or_else(|e| self.config.fail(e))?;
        self.grow_to(next)
    }

    /// Reallocates to `new_capacity` slots and linearizes a wrapped region.
    #[inline(never)]
    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.slots.capacity();
        if new_capacity <= old_capacity {
            return Ok(());
        }
        if let Err(e) = self.slots.try_grow(new_capacity) {
            return self.config.fail(e);
        }

        let mut linearized = false;
        if self.len == 0 {
            self.tail = self.retreat(self.head);
        } else if self.head + self.len > old_capacity {
            // Wrapped: the logically-last elements sit in [0, tail].
            let prefix = self.tail + 1;
            if prefix <= new_capacity - old_capacity {
                self.slots.shift(0, old_capacity, prefix);
                self.tail = old_capacity + prefix - 1;
            } else {
                self.slots.rotate_left(old_capacity, self.head);
                self.head = 0;
                self.tail = self.len - 1;
            }
            linearized = true;
        }
        tracing::trace!(
            old_capacity,
            new_capacity,
            linearized,
            head = self.head,
            "ring queue grew"
        );
        Ok(())
    }

    /// Ensures room for `additional` more elements without further growth.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let Some(required) = self.len.checked_add(additional) else {
            return self.config.fail(Error::RangeOverflow);
        };
        self.ensure_capacity(required)
    }

    /// Grows until at least `required` slots exist. Live elements are kept.
    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        if required <= self.slots.capacity() {
            return Ok(());
        }
        let target = grower::capacity_for(self.slots.capacity(), required, self.element_width())
            .or_else(|e| self.config.fail(e))?;
        self.grow_to(target)
    }

    /// Shrinks the block to `max(len, 1)` slots, moving the front to slot 0.
    pub fn shrink_to_fit(&mut self) {
        let target = self.len.max(1);
        let old_capacity = self.slots.capacity();
        if target >= old_capacity {
            return;
        }
        if self.head != 0 {
            self.slots.rotate_left(old_capacity, self.head);
            self.head = 0;
        }
        self.slots.shrink(target);
        self.tail = self.retreat(self.len % target);
        tracing::debug!(old_capacity, new_capacity = target, "ring queue shrunk");
    }

    // ─── Front / back ─────────────────────────────────────────────────────────

    /// Appends `value` at the back, growing if full.
    pub fn push(&mut self, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.reserve_one()?;
        self.tail = self.advance(self.tail);
        self.slots.write(self.tail, value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the front element.
    pub fn pop(&mut self) -> Result<S::Value> {
        self.check_non_empty()?;
        // SAFETY: the queue is non-empty, so `head` is live.
        let value = unsafe { self.slots.take(self.head) };
        self.head = self.advance(self.head);
        self.len -= 1;
        Ok(value)
    }

    /// Borrows the front element.
    pub fn peek(&self) -> Result<&S::Elem> {
        self.check_non_empty()?;
        // SAFETY: the queue is non-empty, so `head` is live.
        Ok(unsafe { self.slots.slot(self.head) })
    }

    /// Borrows the back element.
    pub fn back(&self) -> Result<&S::Elem> {
        self.check_non_empty()?;
        // SAFETY: the queue is non-empty, so `tail` is live.
        Ok(unsafe { self.slots.slot(self.tail) })
    }

    // ─── Indexed access ───────────────────────────────────────────────────────

    /// Borrows the element at logical `index` (0 is the front).
    pub fn get(&self, index: usize) -> Result<&S::Elem> {
        self.check_index(index)?;
        // SAFETY: `index < len`, so its slot is live.
        Ok(unsafe { self.slots.slot(self.physical(index)) })
    }

    /// Mutably borrows the element at logical `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut S::Elem> {
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`, so its slot is live.
        Ok(unsafe { self.slots.slot_mut(slot) })
    }

    /// Replaces the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: S::Value) -> Result<S::Value> {
        self.check_value(&value)?;
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`, so its slot is live; it is refilled right away.
        let old = unsafe { self.slots.take(slot) };
        self.slots.write(slot, value);
        Ok(old)
    }

    // ─── Interior insert / remove ─────────────────────────────────────────────

    /// Inserts `value` so that it ends up at logical `index`, shifting the
    /// shorter side of the queue by one slot.
    ///
    /// `index == len` appends; `index == 0` prepends.
    pub fn insert(&mut self, index: usize, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.check_insert_index(index)?;
        self.reserve_one()?;
        let gap = self.open_gap(index);
        self.slots.write(gap, value);
        Ok(())
    }

    /// Opens a vacant slot at logical `index`. Requires a free slot.
    fn open_gap(&mut self, index: usize) -> usize {
        let right = self.len - index;
        let gap = if index < right {
            // Move the `index` front elements one slot backward.
            let new_head = self.retreat(self.head);
            let (mut dst, mut src) = (new_head, self.head);
            for _ in 0..index {
                self.slots.shift(src, dst, 1);
                dst = src;
                src = self.advance(src);
            }
            self.head = new_head;
            dst
        } else {
            // Move the `right` back elements one slot forward.
            let new_tail = self.advance(self.tail);
            let (mut dst, mut src) = (new_tail, self.tail);
            for _ in 0..right {
                self.slots.shift(src, dst, 1);
                dst = src;
                src = self.retreat(src);
            }
            self.tail = new_tail;
            dst
        };
        self.len += 1;
        gap
    }

    /// Removes and returns the element at logical `index`, closing the gap from
    /// the shorter side.
    pub fn remove(&mut self, index: usize) -> Result<S::Value> {
        self.check_index(index)?;
        let mut gap = self.physical(index);
        // SAFETY: `index < len`, so its slot is live.
        let value = unsafe { self.slots.take(gap) };
        let right = self.len - 1 - index;
        if index < right {
            for _ in 0..index {
                let src = self.retreat(gap);
                self.slots.shift(src, gap, 1);
                gap = src;
            }
            self.head = self.advance(self.head);
        } else {
            for _ in 0..right {
                let src = self.advance(gap);
                self.slots.shift(src, gap, 1);
                gap = src;
            }
            self.tail = self.retreat(self.tail);
        }
        self.len -= 1;
        Ok(value)
    }

    /// Inserts `value` at logical `index` in O(1) by moving the element that was
    /// there to the back. Order is not preserved.
    pub fn qinsert(&mut self, index: usize, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.check_insert_index(index)?;
        self.reserve_one()?;
        let new_tail = self.advance(self.tail);
        let slot = if index == self.len {
            new_tail
        } else {
            let slot = self.physical(index);
            self.slots.shift(slot, new_tail, 1);
            slot
        };
        self.tail = new_tail;
        self.len += 1;
        self.slots.write(slot, value);
        Ok(())
    }

    /// Removes the element at logical `index` in O(1) by moving the back element
    /// into its slot. Order is not preserved.
    pub fn qremove(&mut self, index: usize) -> Result<S::Value> {
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`, so its slot is live.
        let value = unsafe { self.slots.take(slot) };
        if slot != self.tail {
            self.slots.shift(self.tail, slot, 1);
        }
        self.tail = self.retreat(self.tail);
        self.len -= 1;
        Ok(value)
    }

    // ─── Bulk operations ──────────────────────────────────────────────────────

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        if S::NEEDS_DROP {
            for index in 0..self.len {
                let slot = self.physical(index);
                // SAFETY: `index < len`, so its slot is live.
                unsafe { self.slots.discard(slot) };
            }
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.len = 0;
        self.head = 0;
        self.tail = self.slots.capacity() - 1;
    }

    /// Removes every element front to back, handing each to `destructor`.
    ///
    /// Stops at the first failure with [`Error::Callback`]; elements already
    /// handed over stay removed, the rest stay queued.
    pub fn clear_with<F>(&mut self, mut destructor: F) -> Result<()>
    where
        F: FnMut(S::Value) -> CallbackResult,
    {
        let mut index = 0;
        while self.len > 0 {
            // SAFETY: the queue is non-empty, so `head` is live.
            let value = unsafe { self.slots.take(self.head) };
            self.head = self.advance(self.head);
            self.len -= 1;
            if let Err(failure) = destructor(value) {
                return self.config.fail(failure.at(index));
            }
            index += 1;
        }
        self.reset();
        Ok(())
    }

    /// Consumes the queue, handing every element to `destructor` first.
    ///
    /// On failure the queue is handed back, holding the elements that were not
    /// processed, together with the error.
    pub fn destroy_with<F>(mut self, destructor: F) -> core::result::Result<(), (Self, Error)>
    where
        F: FnMut(S::Value) -> CallbackResult,
    {
        match self.clear_with(destructor) {
            Ok(()) => Ok(()),
            Err(e) => Err((self, e)),
        }
    }

    /// Calls `visitor` on every element front to back, allowing mutation.
    ///
    /// Stops at the first failure; earlier elements keep whatever the visitor
    /// did to them.
    pub fn for_each<F>(&mut self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&mut S::Elem, usize) -> CallbackResult,
    {
        for index in 0..self.len {
            let slot = self.physical(index);
            // SAFETY: `index < len`, so its slot is live.
            let elem = unsafe { self.slots.slot_mut(slot) };
            if let Err(failure) = visitor(elem, index) {
                return self.config.fail(failure.at(index));
            }
        }
        Ok(())
    }

    /// Calls `visitor` on every element front to back.
    pub fn visit<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&S::Elem, usize) -> CallbackResult,
    {
        for (index, elem) in self.iter().enumerate() {
            if let Err(failure) = visitor(elem, index) {
                return self.config.fail(failure.at(index));
            }
        }
        Ok(())
    }

    /// Compares element by element with `comparator`.
    ///
    /// Returns `Ok(false)` on the first pair the comparator rejects or when the
    /// lengths differ.
    pub fn equals_with<F>(&self, other: &Self, mut comparator: F) -> Result<bool>
    where
        F: FnMut(&S::Elem, &S::Elem) -> CallbackResult<bool>,
    {
        if self.len != other.len {
            return Ok(false);
        }
        for (index, (a, b)) in self.iter().zip(other.iter()).enumerate() {
            match comparator(a, b) {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(failure) => return self.config.fail(failure.at(index)),
            }
        }
        Ok(true)
    }

    /// Element-wise equality in logical order.
    pub fn equals(&self, other: &Self) -> bool
    where
        S::Elem: PartialEq,
    {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Replaces the contents with copies produced by `copier` for each element
    /// of `src`, front to back.
    ///
    /// On failure the queue holds the copies made so far.
    pub fn copy_from_with<F>(&mut self, src: &Self, mut copier: F) -> Result<()>
    where
        F: FnMut(&S::Elem) -> CallbackResult<S::Value>,
    {
        // SAFETY: `copy_impl` only passes live slots of `src`.
        self.copy_impl(src, |slots, slot| copier(unsafe { slots.slot(slot) }))
    }

    /// Appends each value from `iter` in order.
    pub fn extend_from<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = S::Value>,
    {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0)?;
        for value in iter {
            self.push(value)?;
        }
        Ok(())
    }

    fn copy_impl<F>(&mut self, src: &Self, mut make: F) -> Result<()>
    where
        F: FnMut(&S, usize) -> CallbackResult<S::Value>,
    {
        if self.element_width() != src.element_width() {
            return self.config.fail(Error::InvalidArgument("element widths differ"));
        }
        // A failed growth must leave `self` untouched.
        self.ensure_capacity(src.len)?;
        self.clear();
        for index in 0..src.len {
            let value = match make(&src.slots, src.physical(index)) {
                Ok(value) => value,
                Err(failure) => return self.config.fail(failure.at(index)),
            };
            self.slots.write(index, value);
            self.tail = index;
            self.len = index + 1;
        }
        Ok(())
    }

    /// Iterates front to back.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            queue: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<S: CloneSlots> RingQueue<S> {
    /// Replaces the contents with copies of `src`'s elements.
    pub fn copy_from(&mut self, src: &Self) -> Result<()> {
        // SAFETY: `copy_impl` only passes live slots of `src`.
        self.copy_impl(src, |slots, slot| Ok(unsafe { slots.value_of(slot) }))
    }

    /// Returns an independent copy with the same capacity and configuration.
    pub fn try_clone(&self) -> Result<Self> {
        let slots = self
            .slots
            .fresh(self.slots.capacity())
            .map_err(|e| self.config.raise(e))?;
        let mut copy = Self::from_slots(slots, self.config)?;
        copy.copy_from(self)?;
        Ok(copy)
    }
}

impl<S: SlotStore> Drop for RingQueue<S> {
    fn drop(&mut self) {
        if S::NEEDS_DROP {
            for index in 0..self.len {
                let slot = self.physical(index);
                // SAFETY: `index < len`, so its slot is live.
                unsafe { self.slots.discard(slot) };
            }
        }
    }
}

impl<S: SlotStore> fmt::Debug for RingQueue<S>
where
    S::Elem: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<S: SlotStore> PartialEq for RingQueue<S>
where
    S::Elem: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// ─── Iteration ────────────────────────────────────────────────────────────────

/// Front-to-back iterator over a [`RingQueue`].
pub struct Iter<'a, S: SlotStore> {
    queue: &'a RingQueue<S>,
    front: usize,
    back: usize,
}

impl<'a, S: SlotStore> Iterator for Iter<'a, S> {
    type Item = &'a S::Elem;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let queue: &'a RingQueue<S> = self.queue;
        let slot = queue.physical(self.front);
        self.front += 1;
        // SAFETY: `front < back <= len`, so the slot is live.
        Some(unsafe { queue.slots.slot(slot) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<S: SlotStore> DoubleEndedIterator for Iter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        let queue = self.queue;
        // SAFETY: `back < len`, so the slot is live.
        Some(unsafe { queue.slots.slot(queue.physical(self.back)) })
    }
}

impl<S: SlotStore> ExactSizeIterator for Iter<'_, S> {}
impl<S: SlotStore> FusedIterator for Iter<'_, S> {}

impl<'a, S: SlotStore> IntoIterator for &'a RingQueue<S> {
    type Item = &'a S::Elem;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
