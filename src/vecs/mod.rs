//! The two containers: a contiguous LIFO stack and a ring-buffer FIFO queue.

pub mod queue;
pub mod stack;

pub use queue::{BitQueue, ByteQueue, RingQueue, StrQueue, TypedQueue};
pub use stack::{ArrayStack, BitStack, ByteStack, StrStack, TypedStack};
