//! Shared element-level interface of stacks and queues.

use crate::config::Config;
use crate::error::{CallbackResult, Result};
use crate::slots::{CloneSlots, SlotStore};
use crate::utils::grower::ElementWidth;
use crate::vecs::{ArrayStack, RingQueue};

// ─── AnyContainer ─────────────────────────────────────────────────────────────

/// An object-safe abstraction over [`ArrayStack`] and [`RingQueue`].
///
/// Code written against `AnyContainer<S>` works with either container over the
/// same slot backend. Index 0 is always the next element [`pop`](Self::pop)
/// returns: the top of a stack, the front of a queue.
///
/// Callback operations take `&mut dyn FnMut` so the trait stays usable as
/// `dyn AnyContainer<S>`. Operations pairing two containers require both to be
/// the same concrete type and are unavailable through a trait object.
pub trait AnyContainer<S: SlotStore> {
    /// Returns the number of live elements.
    fn len(&self) -> usize;
    /// Returns `true` if the container holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Returns the number of allocated slots.
    fn capacity(&self) -> usize;
    /// Returns the width of each element.
    fn element_width(&self) -> ElementWidth;
    /// Returns the construction-time configuration.
    fn config(&self) -> Config;
    /// Adds an element at the push end.
    fn push(&mut self, value: S::Value) -> Result<()>;
    /// Removes the next element in pop order.
    fn pop(&mut self) -> Result<S::Value>;
    /// Borrows the next element in pop order.
    fn peek(&self) -> Result<&S::Elem>;
    /// Borrows the element at `index`.
    fn get(&self, index: usize) -> Result<&S::Elem>;
    /// Mutably borrows the element at `index`.
    fn get_mut(&mut self, index: usize) -> Result<&mut S::Elem>;
    /// Replaces the element at `index`, returning the old one.
    fn set(&mut self, index: usize, value: S::Value) -> Result<S::Value>;
    /// Order-preserving insert so the value ends up at `index`.
    fn insert(&mut self, index: usize, value: S::Value) -> Result<()>;
    /// O(1) insert at `index` that may reorder other elements.
    fn qinsert(&mut self, index: usize, value: S::Value) -> Result<()>;
    /// Order-preserving removal.
    fn remove(&mut self, index: usize) -> Result<S::Value>;
    /// O(1) removal that may reorder other elements.
    fn qremove(&mut self, index: usize) -> Result<S::Value>;
    /// Drops every element.
    fn clear(&mut self);

    /// Ensures room for `additional` more elements.
    fn reserve(&mut self, additional: usize) -> Result<()>;
    /// Shrinks the block to `max(len, 1)` slots.
    fn shrink_to_fit(&mut self);
    /// Removes every element in index order, handing each to `destructor`.
    fn clear_with(&mut self, destructor: &mut dyn FnMut(S::Value) -> CallbackResult) -> Result<()>;
    /// Calls `visitor` on every element in index order, allowing mutation.
    fn for_each(
        &mut self,
        visitor: &mut dyn FnMut(&mut S::Elem, usize) -> CallbackResult,
    ) -> Result<()>;
    /// Calls `visitor` on every element in index order.
    fn visit(&self, visitor: &mut dyn FnMut(&S::Elem, usize) -> CallbackResult) -> Result<()>;
    /// Iterates in index order.
    fn iter(&self) -> Box<dyn Iterator<Item = &S::Elem> + '_>;

    /// Replaces the contents with copies of `src`'s elements.
    fn copy_from(&mut self, src: &Self) -> Result<()>
    where
        Self: Sized,
        S: CloneSlots;
    /// Replaces the contents with copies produced by `copier`.
    fn copy_from_with(
        &mut self,
        src: &Self,
        copier: &mut dyn FnMut(&S::Elem) -> CallbackResult<S::Value>,
    ) -> Result<()>
    where
        Self: Sized;
    /// Element-wise equality in index order.
    fn equals(&self, other: &Self) -> bool
    where
        Self: Sized,
        S::Elem: PartialEq;
    /// Element-wise comparison with `comparator`.
    fn equals_with(
        &self,
        other: &Self,
        comparator: &mut dyn FnMut(&S::Elem, &S::Elem) -> CallbackResult<bool>,
    ) -> Result<bool>
    where
        Self: Sized;
}

macro_rules! impl_any_container {
    ($ty:ident) => {
        impl<S: SlotStore> AnyContainer<S> for $ty<S> {
            fn len(&self) -> usize {
                self.len()
            }
            fn capacity(&self) -> usize {
                self.capacity()
            }
            fn element_width(&self) -> ElementWidth {
                self.element_width()
            }
            fn config(&self) -> Config {
                self.config()
            }
            fn push(&mut self, value: S::Value) -> Result<()> {
                self.push(value)
            }
            fn pop(&mut self) -> Result<S::Value> {
                self.pop()
            }
            fn peek(&self) -> Result<&S::Elem> {
                self.peek()
            }
            fn get(&self, index: usize) -> Result<&S::Elem> {
                self.get(index)
            }
            fn get_mut(&mut self, index: usize) -> Result<&mut S::Elem> {
                self.get_mut(index)
            }
            fn set(&mut self, index: usize, value: S::Value) -> Result<S::Value> {
                self.set(index, value)
            }
            fn insert(&mut self, index: usize, value: S::Value) -> Result<()> {
                self.insert(index, value)
            }
            fn qinsert(&mut self, index: usize, value: S::Value) -> Result<()> {
                self.qinsert(index, value)
            }
            fn remove(&mut self, index: usize) -> Result<S::Value> {
                self.remove(index)
            }
            fn qremove(&mut self, index: usize) -> Result<S::Value> {
                self.qremove(index)
            }
            fn clear(&mut self) {
                self.clear();
            }
            fn reserve(&mut self, additional: usize) -> Result<()> {
                self.reserve(additional)
            }
            fn shrink_to_fit(&mut self) {
                self.shrink_to_fit();
            }
            fn clear_with(
                &mut self,
                destructor: &mut dyn FnMut(S::Value) -> CallbackResult,
            ) -> Result<()> {
                self.clear_with(destructor)
            }
            fn for_each(
                &mut self,
                visitor: &mut dyn FnMut(&mut S::Elem, usize) -> CallbackResult,
            ) -> Result<()> {
                self.for_each(visitor)
            }
            fn visit(
                &self,
                visitor: &mut dyn FnMut(&S::Elem, usize) -> CallbackResult,
            ) -> Result<()> {
                self.visit(visitor)
            }
            fn iter(&self) -> Box<dyn Iterator<Item = &S::Elem> + '_> {
                Box::new(self.iter())
            }
            fn copy_from(&mut self, src: &Self) -> Result<()>
            where
                S: CloneSlots,
            {
                self.copy_from(src)
            }
            fn copy_from_with(
                &mut self,
                src: &Self,
                copier: &mut dyn FnMut(&S::Elem) -> CallbackResult<S::Value>,
            ) -> Result<()> {
                self.copy_from_with(src, copier)
            }
            fn equals(&self, other: &Self) -> bool
            where
                S::Elem: PartialEq,
            {
                self.equals(other)
            }
            fn equals_with(
                &self,
                other: &Self,
                comparator: &mut dyn FnMut(&S::Elem, &S::Elem) -> CallbackResult<bool>,
            ) -> Result<bool> {
                self.equals_with(other, comparator)
            }
        }
    };
}

impl_any_container!(ArrayStack);
impl_any_container!(RingQueue);
