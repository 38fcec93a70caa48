//! # Ringstack
//!
//! Growable, contiguous-storage stacks and ring-buffer queues over fixed-width
//! element slots.
//!
//! Both containers sit on a [`SlotStore`]: one block of `capacity` equal-width
//! slots. The element width is fixed at construction and comes in three kinds:
//!
//! * **Byte records** ([`ByteStack`], [`ByteQueue`]): `element_size` raw bytes per
//!   element, chosen at runtime. [`ScalarAccess`] adds typed numeric access.
//! * **Typed values** ([`TypedStack`], [`TypedQueue`]): any sized `T`, including
//!   owned strings ([`StrStack`], [`StrQueue`]) which are dropped with the
//!   container.
//! * **Bits** ([`BitStack`], [`BitQueue`]): one bit per element via `bitvec`.
//!
//! ## Growth
//!
//! A full container doubles its capacity, saturating at the largest slot count
//! a single allocation can address, then fails with [`Error::RangeOverflow`].
//! Allocation failures surface as [`Error::OutOfMemory`] instead of aborting.
//!
//! ## Errors
//!
//! Every fallible operation returns [`Result`]. Apart from callback failures, a
//! failed operation leaves the container unchanged. Each container carries a
//! [`Config`] whose [`ErrorPolicy`] decides whether failures are also logged
//! through `tracing` or turned into panics.
//!
//! ## Example
//!
//! ```rust
//! use ringstack::{TypedQueue, TypedStack};
//!
//! let mut stack: TypedStack<&str> = TypedStack::new(2).unwrap();
//! stack.push("a").unwrap();
//! stack.push("b").unwrap();
//! assert_eq!(stack.pop(), Ok("b"));
//!
//! let mut queue: TypedQueue<u8> = TypedQueue::new(2).unwrap();
//! queue.extend_from([1, 2, 3]).unwrap();
//! assert_eq!(queue.capacity(), 4);
//! assert_eq!(queue.pop(), Ok(1));
//! ```

// --- Module Declarations ---

pub mod config;
pub mod container;
pub mod error;
pub mod scalar;
pub mod slots;
pub mod utils;
pub mod vecs;

// --- Re-exports ---

pub use config::{Config, ErrorPolicy};
pub use container::AnyContainer;
pub use error::{CallbackFailure, CallbackResult, Error, IllegalOperation, Result};
pub use scalar::{BitAccess, Scalar, ScalarAccess, StrAccess};
pub use slots::{BitSlots, ByteSlots, CloneSlots, SlotStore, TypedSlots};
pub use utils::grower::{self, ElementWidth};
pub use vecs::{
    ArrayStack, BitQueue, BitStack, ByteQueue, ByteStack, RingQueue, StrQueue, StrStack,
    TypedQueue, TypedStack,
};
