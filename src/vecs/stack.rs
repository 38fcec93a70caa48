//! Growable LIFO stack over a contiguous slot block.
//!
//! [`ArrayStack`] stores its bottom element in slot 0 and its top element in
//! slot `len - 1`. Logical indices count from the top: index 0 is the element
//! [`pop`](ArrayStack::pop) would return next.
//!
//! Growth never moves elements relative to slot 0, so it is a plain reallocation.
//! Interior [`insert`](ArrayStack::insert) and [`remove`](ArrayStack::remove)
//! shift the `index` elements above the target by one slot.

use crate::config::Config;
use crate::error::{CallbackResult, Error, IllegalOperation, Result};
use crate::slots::{BitSlots, ByteSlots, CloneSlots, SlotStore, TypedSlots};
use crate::utils::grower::{self, ElementWidth};
use core::fmt;
use core::iter::FusedIterator;

/// A growable LIFO stack over a contiguous block of slots.
pub struct ArrayStack<S: SlotStore> {
    slots: S,
    len: usize,
    config: Config,
}

/// Stack of raw byte records whose width is chosen at runtime.
pub type ByteStack = ArrayStack<ByteSlots>;
/// Stack of typed values.
pub type TypedStack<T> = ArrayStack<TypedSlots<T>>;
/// Stack of owned strings.
pub type StrStack = TypedStack<String>;
/// Stack of booleans packed one bit per element.
pub type BitStack = ArrayStack<BitSlots>;

impl ArrayStack<ByteSlots> {
    /// Creates an empty stack of `capacity` records, each `element_size` bytes.
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Self::with_config(element_size, capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(element_size: usize, capacity: usize, config: Config) -> Result<Self> {
        let slots = ByteSlots::with_capacity(element_size, capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl<T> ArrayStack<TypedSlots<T>> {
    /// Creates an empty stack with room for `capacity` values.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(capacity: usize, config: Config) -> Result<Self> {
        let slots = TypedSlots::with_capacity(capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl ArrayStack<BitSlots> {
    /// Creates an empty stack with room for `capacity` bits.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(capacity, Config::default())
    }

    /// Like [`new`](Self::new) with an explicit configuration.
    pub fn with_config(capacity: usize, config: Config) -> Result<Self> {
        let slots = BitSlots::with_capacity(capacity).map_err(|e| config.raise(e))?;
        Self::from_slots(slots, config)
    }
}

impl<S: SlotStore> ArrayStack<S> {
    /// Wraps an empty slot store.
    pub fn from_slots(slots: S, config: Config) -> Result<Self> {
        if slots.capacity() == 0 {
            return config.fail(Error::InvalidArgument("capacity must be nonzero"));
        }
        Ok(Self {
            slots,
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

    /// Returns `true` if the stack holds no elements.
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

    /// The underlying slot store; slot 0 is the bottom of the stack.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Physical slot of logical `index` (0 is the top).
    #[inline(always)]
    fn physical(&self, index: usize) -> usize {
        self.len - 1 - index
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

    #[inline(always)]
    fn reserve_one(&mut self) -> Result<()> {
        if self.len < self.slots.capacity() {
            return Ok(());
        }
        let next = grower::next_capacity(self.slots.capacity(), self.element_width())
            .or_else(|e| self.config.fail(e))?;
        self.grow_to(next)
    }

    #[inline(never)]
    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.slots.capacity();
        if new_capacity <= old_capacity {
            return Ok(());
        }
        if let Err(e) = self.slots.try_grow(new_capacity) {
            return self.config.fail(e);
        }
        tracing::trace!(old_capacity, new_capacity, "array stack grew");
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

    /// Shrinks the block to `max(len, 1)` slots.
    pub fn shrink_to_fit(&mut self) {
        let target = self.len.max(1);
        let old_capacity = self.slots.capacity();
        if target < old_capacity {
            self.slots.shrink(target);
            tracing::debug!(old_capacity, new_capacity = target, "array stack shrunk");
        }
    }

    // ─── Top ──────────────────────────────────────────────────────────────────

    /// Pushes `value` on top, growing if full.
    pub fn push(&mut self, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.reserve_one()?;
        self.slots.write(self.len, value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Result<S::Value> {
        self.check_non_empty()?;
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live.
        Ok(unsafe { self.slots.take(self.len) })
    }

    /// Borrows the top element.
    pub fn peek(&self) -> Result<&S::Elem> {
        self.check_non_empty()?;
        // SAFETY: the stack is non-empty.
        Ok(unsafe { self.slots.slot(self.len - 1) })
    }

    // ─── Indexed access ───────────────────────────────────────────────────────

    /// Borrows the element `index` positions below the top.
    pub fn get(&self, index: usize) -> Result<&S::Elem> {
        self.check_index(index)?;
        // SAFETY: `index < len`.
        Ok(unsafe { self.slots.slot(self.physical(index)) })
    }

    /// Mutably borrows the element `index` positions below the top.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut S::Elem> {
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`.
        Ok(unsafe { self.slots.slot_mut(slot) })
    }

    /// Replaces the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: S::Value) -> Result<S::Value> {
        self.check_value(&value)?;
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`; the slot is refilled right away.
        let old = unsafe { self.slots.take(slot) };
        self.slots.write(slot, value);
        Ok(old)
    }

    // ─── Interior insert / remove ─────────────────────────────────────────────

    /// Inserts `value` so that it ends up `index` positions below the top.
    ///
    /// `index == 0` pushes; `index == len` places the value at the bottom.
    pub fn insert(&mut self, index: usize, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.check_insert_index(index)?;
        self.reserve_one()?;
        let slot = self.len - index;
        self.slots.shift(slot, slot + 1, index);
        self.slots.write(slot, value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, moving the elements above it
    /// down by one slot.
    pub fn remove(&mut self, index: usize) -> Result<S::Value> {
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`.
        let value = unsafe { self.slots.take(slot) };
        self.slots.shift(slot + 1, slot, index);
        self.len -= 1;
        Ok(value)
    }

    /// Inserts `value` at `index` in O(1); the element it displaces moves to the
    /// top. Order is not preserved.
    pub fn qinsert(&mut self, index: usize, value: S::Value) -> Result<()> {
        self.check_value(&value)?;
        self.check_insert_index(index)?;
        self.reserve_one()?;
        let top = self.len;
        let slot = top - index;
        if slot != top {
            self.slots.shift(slot, top, 1);
        }
        self.slots.write(slot, value);
        self.len += 1;
        Ok(())
    }

    /// Removes the element at `index` in O(1) by moving the top element into
    /// its slot. Order is not preserved.
    pub fn qremove(&mut self, index: usize) -> Result<S::Value> {
        self.check_index(index)?;
        let slot = self.physical(index);
        // SAFETY: `index < len`.
        let value = unsafe { self.slots.take(slot) };
        let top = self.len - 1;
        if slot != top {
            self.slots.shift(top, slot, 1);
        }
        self.len -= 1;
        Ok(value)
    }

    // ─── Bulk operations ──────────────────────────────────────────────────────

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        if S::NEEDS_DROP {
            for slot in 0..self.len {
                // SAFETY: slots below `len` are live.
                unsafe { self.slots.discard(slot) };
            }
        }
        self.len = 0;
    }

    /// Pops every element top to bottom, handing each to `destructor`.
    ///
    /// Stops at the first failure with [`Error::Callback`]; the failing element
    /// is consumed and the rest stay on the stack.
    pub fn clear_with<F>(&mut self, mut destructor: F) -> Result<()>
    where
        F: FnMut(S::Value) -> CallbackResult,
    {
        let mut index = 0;
        while self.len > 0 {
            self.len -= 1;
            // SAFETY: the slot at the old `len - 1` was live.
            let value = unsafe { self.slots.take(self.len) };
            if let Err(failure) = destructor(value) {
                return self.config.fail(failure.at(index));
            }
            index += 1;
        }
        Ok(())
    }

    /// Consumes the stack, handing every element to `destructor` first.
    ///
    /// On failure the stack is handed back with the unprocessed elements.
    pub fn destroy_with<F>(mut self, destructor: F) -> core::result::Result<(), (Self, Error)>
    where
        F: FnMut(S::Value) -> CallbackResult,
    {
        match self.clear_with(destructor) {
            Ok(()) => Ok(()),
            Err(e) => Err((self, e)),
        }
    }

    /// Calls `visitor` on every element top to bottom, allowing mutation.
    pub fn for_each<F>(&mut self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&mut S::Elem, usize) -> CallbackResult,
    {
        for index in 0..self.len {
            let slot = self.physical(index);
            // SAFETY: `index < len`.
            let elem = unsafe { self.slots.slot_mut(slot) };
            if let Err(failure) = visitor(elem, index) {
                return self.config.fail(failure.at(index));
            }
        }
        Ok(())
    }

    /// Calls `visitor` on every element top to bottom.
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

    /// Compares element by element, top to bottom, with `comparator`.
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

    /// Element-wise equality.
    pub fn equals(&self, other: &Self) -> bool
    where
        S::Elem: PartialEq,
    {
        self.len == other.len && self.slots_live().eq(other.slots_live())
    }

    fn slots_live(&self) -> impl Iterator<Item = &S::Elem> {
        // SAFETY: slots below `len` are live.
        (0..self.len).map(|slot| unsafe { self.slots.slot(slot) })
    }

    /// Replaces the contents with copies produced by `copier`, visiting `src`
    /// top to bottom.
    ///
    /// On failure the stack holds copies of the `k` topmost elements of `src`
    /// that were made before the failing one.
    pub fn copy_from_with<F>(&mut self, src: &Self, mut copier: F) -> Result<()>
    where
        F: FnMut(&S::Elem) -> CallbackResult<S::Value>,
    {
        // SAFETY: `copy_impl` only passes live slots of `src`.
        self.copy_impl(src, |slots, slot| copier(unsafe { slots.slot(slot) }))
    }

    /// Pushes each value from `iter` in order; the last one ends up on top.
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
        let n = src.len;
        for index in 0..n {
            let slot = src.physical(index);
            match make(&src.slots, slot) {
                Ok(value) => self.slots.write(slot, value),
                Err(failure) => {
                    // Move the copied top run down to the bottom.
                    self.slots.shift(n - index, 0, index);
                    self.len = index;
                    return self.config.fail(failure.at(index));
                }
            }
        }
        self.len = n;
        Ok(())
    }

    /// Iterates top to bottom.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            stack: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<S: CloneSlots> ArrayStack<S> {
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

impl<S: SlotStore> Drop for ArrayStack<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<S: SlotStore> fmt::Debug for ArrayStack<S>
where
    S::Elem: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<S: SlotStore> PartialEq for ArrayStack<S>
where
    S::Elem: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// ─── Iteration ────────────────────────────────────────────────────────────────

/// Top-to-bottom iterator over an [`ArrayStack`].
pub struct Iter<'a, S: SlotStore> {
    stack: &'a ArrayStack<S>,
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
        let stack: &'a ArrayStack<S> = self.stack;
        let slot = stack.physical(self.front);
        self.front += 1;
        // SAFETY: `front < back <= len`.
        Some(unsafe { stack.slots.slot(slot) })
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
        let stack = self.stack;
        // SAFETY: `back < len`.
        Some(unsafe { stack.slots.slot(stack.physical(self.back)) })
    }
}

impl<S: SlotStore> ExactSizeIterator for Iter<'_, S> {}
impl<S: SlotStore> FusedIterator for Iter<'_, S> {}

impl<'a, S: SlotStore> IntoIterator for &'a ArrayStack<S> {
    type Item = &'a S::Elem;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallbackFailure;
    use crate::slots::mock::MockSlots;
    use proptest::prelude::*;

    /// Top-to-bottom contents.
    fn contents(s: &TypedStack<i32>) -> Vec<i32> {
        s.iter().copied().collect()
    }

    fn stack_of(cap: usize, bottom_to_top: impl IntoIterator<Item = i32>) -> TypedStack<i32> {
        let mut s = TypedStack::with_config(cap, Config::quiet()).unwrap();
        s.extend_from(bottom_to_top).unwrap();
        s
    }

    #[test]
    fn test_stack_push_pop_lifo() {
        let mut s: TypedStack<i32> = TypedStack::new(2).unwrap();
        s.push(1).unwrap();
        s.push(2).unwrap();
        s.push(3).unwrap();
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.peek(), Ok(&3));
        assert_eq!(s.pop(), Ok(3));
        assert_eq!(s.pop(), Ok(2));
        assert_eq!(s.pop(), Ok(1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_stack_empty_and_range_errors() {
        let mut s = stack_of(2, []);
        let empty = Error::IllegalOperation(IllegalOperation::Empty);
        assert_eq!(s.pop(), Err(empty));
        assert_eq!(s.peek(), Err(empty));
        assert_eq!(s.get(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));
        assert_eq!(s.insert(1, 5), Err(Error::IndexOutOfRange { index: 1, len: 0 }));
        assert!(matches!(
            TypedStack::<i32>::with_config(0, Config::quiet()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_stack_indices_count_from_top() {
        let mut s = stack_of(4, [1, 2, 3]);
        assert_eq!(contents(&s), [3, 2, 1]);
        assert_eq!(s.get(0), Ok(&3));
        assert_eq!(s.get(2), Ok(&1));
        assert_eq!(s.set(1, 20), Ok(2));
        *s.get_mut(2).unwrap() = 10;
        assert_eq!(contents(&s), [3, 20, 10]);
    }

    #[test]
    fn test_stack_insert_remove_preserve_order() {
        let mut s = stack_of(3, [1, 2, 3]);
        s.insert(1, 9).unwrap();
        assert_eq!(contents(&s), [3, 9, 2, 1]);
        s.insert(4, 0).unwrap();
        assert_eq!(contents(&s), [3, 9, 2, 1, 0]);
        s.insert(0, 7).unwrap();
        assert_eq!(contents(&s), [7, 3, 9, 2, 1, 0]);
        assert_eq!(s.remove(2), Ok(9));
        assert_eq!(s.remove(4), Ok(0));
        assert_eq!(s.remove(0), Ok(7));
        assert_eq!(contents(&s), [3, 2, 1]);
        assert_eq!(s.remove(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_stack_quick_insert_remove() {
        let mut s = stack_of(4, [1, 2, 3, 4]);
        s.qinsert(2, 9).unwrap();
        assert_eq!(s.get(2), Ok(&9));
        assert_eq!(contents(&s), [3, 4, 9, 2, 1]);
        s.qinsert(0, 8).unwrap();
        assert_eq!(s.peek(), Ok(&8));
        s.qinsert(6, 5).unwrap();
        assert_eq!(s.get(6), Ok(&5));

        assert_eq!(s.qremove(4), Ok(9));
        let mut rest = contents(&s);
        rest.sort();
        assert_eq!(rest, [1, 2, 3, 4, 5, 8]);
        let top = *s.peek().unwrap();
        assert_eq!(s.qremove(0), Ok(top));
    }

    #[test]
    fn test_stack_bytes_width_mismatch() {
        let mut s = ByteStack::with_config(3, 1, Config::quiet()).unwrap();
        s.push(vec![1, 2, 3]).unwrap();
        assert_eq!(
            s.push(vec![1]),
            Err(Error::IllegalOperation(IllegalOperation::WidthMismatch {
                expected: 3,
                found: 1
            }))
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.peek(), Ok(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_stack_reserve_and_shrink() {
        let mut s = stack_of(1, [1]);
        s.reserve(6).unwrap();
        assert!(s.capacity() >= 7);
        s.push(2).unwrap();
        s.shrink_to_fit();
        assert_eq!(s.capacity(), 2);
        assert_eq!(contents(&s), [2, 1]);
        assert_eq!(s.reserve(usize::MAX), Err(Error::RangeOverflow));
    }

    #[test]
    fn test_stack_strings_dropped_once() {
        use std::rc::Rc;
        let marker = Rc::new(());
        {
            let mut s: TypedStack<Rc<()>> = TypedStack::new(1).unwrap();
            for _ in 0..4 {
                s.push(Rc::clone(&marker)).unwrap();
            }
            s.remove(1).unwrap();
            assert_eq!(Rc::strong_count(&marker), 4);
        }
        assert_eq!(Rc::strong_count(&marker), 1);

        let mut s = StrStack::new(2).unwrap();
        s.push("a".to_string()).unwrap();
        s.push("b".to_string()).unwrap();
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_stack_clear_with_top_first() {
        let mut s = stack_of(4, [1, 2, 3, 4]);
        let mut seen = Vec::new();
        let err = s
            .clear_with(|v| {
                seen.push(v);
                if v == 3 { Err(CallbackFailure::new(-5)) } else { Ok(()) }
            })
            .unwrap_err();
        assert_eq!(err, Error::Callback { index: 1, code: -5 });
        assert_eq!(seen, [4, 3]);
        assert_eq!(contents(&s), [2, 1]);

        let (s, _) = s
            .destroy_with(|_| Err(CallbackFailure::default()))
            .unwrap_err();
        assert_eq!(contents(&s), [1]);
        s.destroy_with(|_| Ok(())).unwrap();
    }

    #[test]
    fn test_stack_for_each_visit_order() {
        let mut s = stack_of(4, [1, 2, 3]);
        s.for_each(|v, i| {
            *v = *v * 10 + i as i32;
            Ok(())
        })
        .unwrap();
        assert_eq!(contents(&s), [30, 21, 12]);
        let mut order = Vec::new();
        s.visit(|v, _| {
            order.push(*v);
            Ok(())
        })
        .unwrap();
        assert_eq!(order, [30, 21, 12]);
        assert_eq!(
            s.visit(|_, i| if i == 2 { Err(CallbackFailure::new(1)) } else { Ok(()) }),
            Err(Error::Callback { index: 2, code: 1 })
        );
    }

    #[test]
    fn test_stack_copy_and_clone() {
        let src = stack_of(8, [1, 2, 3]);
        let mut dst: TypedStack<i32> = TypedStack::new(1).unwrap();
        dst.copy_from(&src).unwrap();
        assert_eq!(dst, src);
        let clone = src.try_clone().unwrap();
        assert_eq!(clone.capacity(), 8);
        assert!(clone.equals(&src));
        assert_eq!(src.equals_with(&clone, |a, b| Ok(a == b)), Ok(true));
        assert_eq!(src.equals_with(&clone, |_, _| Ok(false)), Ok(false));
    }

    #[test]
    fn test_stack_copy_from_with_keeps_copied_top() {
        let src = stack_of(8, [1, 2, 3, 4]);
        let mut dst = stack_of(2, [100]);
        let err = dst
            .copy_from_with(&src, |v| if *v > 2 { Ok(*v) } else { Err(CallbackFailure::new(9)) })
            .unwrap_err();
        assert_eq!(err, Error::Callback { index: 2, code: 9 });
        assert_eq!(contents(&dst), [4, 3]);
        dst.push(5).unwrap();
        assert_eq!(contents(&dst), [5, 4, 3]);
    }

    #[test]
    fn test_stack_copy_single_element_equals() {
        let src = stack_of(1, [42]);
        let mut dst = stack_of(4, [1, 2, 3]);
        dst.copy_from(&src).unwrap();
        assert!(dst.equals(&src));
        assert_eq!(contents(&dst), [42]);
    }

    #[test]
    fn test_stack_failed_copy_growth_keeps_destination() {
        let mut dst = ArrayStack::from_slots(MockSlots::failing(2), Config::quiet()).unwrap();
        dst.push(100).unwrap();
        dst.push(200).unwrap();
        let mut src = ArrayStack::from_slots(MockSlots::new(4, 4), Config::quiet()).unwrap();
        src.extend_from([1, 2, 3, 4]).unwrap();

        assert_eq!(
            dst.copy_from_with(&src, |v| Ok(*v)),
            Err(Error::OutOfMemory { bytes: 4 })
        );
        assert_eq!(dst.iter().copied().collect::<Vec<_>>(), [200, 100]);
        assert_eq!(dst.copy_from(&src), Err(Error::OutOfMemory { bytes: 4 }));
        assert_eq!(dst.len(), 2);
        assert_eq!(dst.peek(), Ok(&200));
    }

    #[test]
    fn test_stack_saturated_growth_then_overflow() {
        let width = isize::MAX as usize / 5;
        let mut s = ArrayStack::from_slots(MockSlots::new(4, width), Config::quiet()).unwrap();
        s.extend_from([1, 2, 3, 4, 5]).unwrap();
        assert_eq!(s.capacity(), 5);
        assert_eq!(s.push(6), Err(Error::RangeOverflow));
        assert_eq!(s.insert(2, 6), Err(Error::RangeOverflow));
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_stack_bits() {
        let mut s = BitStack::new(2).unwrap();
        s.extend_from([true, false, true]).unwrap();
        assert_eq!(s.capacity(), 4);
        assert!(s.peek().unwrap()[0]);
        assert!(!s.get(1).unwrap()[0]);
        s.get_mut(1).unwrap().set(0, true);
        assert_eq!(s.pop(), Ok(true));
        assert_eq!(s.pop(), Ok(true));
        assert_eq!(s.pop(), Ok(true));
    }

    #[test]
    fn test_stack_iter_rev_is_bottom_up() {
        let s = stack_of(4, [1, 2, 3]);
        assert_eq!(s.iter().rev().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(format!("{s:?}"), "[3, 2, 1]");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(i32),
        Pop,
        Insert(usize, i32),
        Remove(usize),
        Set(usize, i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<i32>().prop_map(Op::Push),
            2 => Just(Op::Pop),
            2 => (0..30usize, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (0..30usize).prop_map(Op::Remove),
            1 => (0..30usize, any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
        ]
    }

    proptest! {
        // The model is a Vec with the top at the end.
        #[test]
        fn test_stack_matches_vec_model(cap in 1usize..5, ops in prop::collection::vec(op(), 0..150)) {
            let mut s: TypedStack<i32> = TypedStack::with_config(cap, Config::quiet()).unwrap();
            let mut model: Vec<i32> = Vec::new();
            for op in ops {
                match op {
                    Op::Push(v) => {
                        s.push(v).unwrap();
                        model.push(v);
                    }
                    Op::Pop => prop_assert_eq!(s.pop().ok(), model.pop()),
                    Op::Insert(i, v) => {
                        let ok = s.insert(i, v).is_ok();
                        prop_assert_eq!(ok, i <= model.len());
                        if ok {
                            model.insert(model.len() - i, v);
                        }
                    }
                    Op::Remove(i) => {
                        let expected = (i < model.len()).then(|| model.remove(model.len() - 1 - i));
                        prop_assert_eq!(s.remove(i).ok(), expected);
                    }
                    Op::Set(i, v) => {
                        let expected = (i < model.len()).then(|| {
                            let at = model.len() - 1 - i;
                            core::mem::replace(&mut model[at], v)
                        });
                        prop_assert_eq!(s.set(i, v).ok(), expected);
                    }
                }
                let top_down: Vec<i32> = model.iter().rev().copied().collect();
                prop_assert_eq!(contents(&s), top_down);
            }
        }
    }
}
