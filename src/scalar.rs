//! Typed access over byte, string and bit containers.
//!
//! The traits here are blanket-implemented for every [`AnyContainer`] of the
//! matching backend, so they work the same on stacks and queues:
//!
//! ```
//! use ringstack::{ByteQueue, ScalarAccess};
//!
//! let mut q = ByteQueue::new(8, 4).unwrap();
//! q.push_scalar(1.5f64).unwrap();
//! q.push_scalar(-2i64).unwrap(); // same width, different type
//! assert_eq!(q.pop_scalar::<f64>(), Ok(1.5));
//! assert!(q.pop_scalar::<u32>().is_err()); // width mismatch
//! ```

use crate::container::AnyContainer;
use crate::error::{Error, IllegalOperation, Result};
use crate::slots::{BitSlots, ByteSlots, TypedSlots};
use crate::utils::grower::ElementWidth;
use core::mem;

// ─── Scalar ───────────────────────────────────────────────────────────────────

/// A fixed-width value stored in native byte order.
pub trait Scalar: Copy {
    /// Width in bytes.
    const WIDTH: usize;

    /// Encodes into `WIDTH` bytes.
    fn to_bytes(self) -> Vec<u8>;

    /// Decodes from exactly `WIDTH` bytes.
    fn from_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const WIDTH: usize = mem::size_of::<$t>();

            #[inline]
            fn to_bytes(self) -> Vec<u8> {
                self.to_ne_bytes().to_vec()
            }

            #[inline]
            fn from_bytes(bytes: &[u8]) -> Self {
                let mut buf = [0u8; mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_ne_bytes(buf)
            }
        }
    )*};
}

impl_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// Fixed-width scalar operations on byte containers.
///
/// Every method first checks that the container's element width equals
/// `T::WIDTH` and fails with [`IllegalOperation::WidthMismatch`] otherwise.
pub trait ScalarAccess {
    /// Pushes `value` encoded in native byte order.
    fn push_scalar<T: Scalar>(&mut self, value: T) -> Result<()>;
    /// Pops the next element and decodes it as `T`.
    fn pop_scalar<T: Scalar>(&mut self) -> Result<T>;
    /// Decodes the next element without removing it.
    fn peek_scalar<T: Scalar>(&self) -> Result<T>;
    /// Decodes the element at `index`.
    fn get_scalar<T: Scalar>(&self, index: usize) -> Result<T>;
    /// Overwrites the element at `index`. Returns the replaced value.
    fn set_scalar<T: Scalar>(&mut self, index: usize, value: T) -> Result<T>;
    /// Order-preserving insert of `value` at `index`.
    fn insert_scalar<T: Scalar>(&mut self, index: usize, value: T) -> Result<()>;
    /// Order-preserving removal; decodes the removed element.
    fn remove_scalar<T: Scalar>(&mut self, index: usize) -> Result<T>;
}

fn check_width<T: Scalar, C>(container: &C) -> Result<()>
where
    C: AnyContainer<ByteSlots> + ?Sized,
{
    match container.element_width() {
        ElementWidth::Bytes(n) if n.get() == T::WIDTH => Ok(()),
        width => {
            let expected = width.byte_size().unwrap_or(0);
            Err(container.config().raise(
                IllegalOperation::WidthMismatch {
                    expected,
                    found: T::WIDTH,
                }
                .into(),
            ))
        }
    }
}

impl<C> ScalarAccess for C
where
    C: AnyContainer<ByteSlots> + ?Sized,
{
    fn push_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        check_width::<T, Self>(self)?;
        self.push(value.to_bytes())
    }

    fn pop_scalar<T: Scalar>(&mut self) -> Result<T> {
        check_width::<T, Self>(self)?;
        self.pop().map(|bytes| T::from_bytes(&bytes))
    }

    fn peek_scalar<T: Scalar>(&self) -> Result<T> {
        check_width::<T, Self>(self)?;
        self.peek().map(T::from_bytes)
    }

    fn get_scalar<T: Scalar>(&self, index: usize) -> Result<T> {
        check_width::<T, Self>(self)?;
        self.get(index).map(T::from_bytes)
    }

    fn set_scalar<T: Scalar>(&mut self, index: usize, value: T) -> Result<T> {
        check_width::<T, Self>(self)?;
        self.set(index, value.to_bytes())
            .map(|bytes| T::from_bytes(&bytes))
    }

    fn insert_scalar<T: Scalar>(&mut self, index: usize, value: T) -> Result<()> {
        check_width::<T, Self>(self)?;
        self.insert(index, value.to_bytes())
    }

    fn remove_scalar<T: Scalar>(&mut self, index: usize) -> Result<T> {
        check_width::<T, Self>(self)?;
        self.remove(index).map(|bytes| T::from_bytes(&bytes))
    }
}

// ─── Strings ──────────────────────────────────────────────────────────────────

/// Borrowed-string operations on containers of owned `String`s.
///
/// Incoming `&str` values are copied into a fresh allocation; an allocator
/// failure surfaces as [`Error::OutOfMemory`] instead of aborting.
pub trait StrAccess {
    /// Pushes an owned copy of `s`.
    fn push_str(&mut self, s: &str) -> Result<()>;
    /// Borrows the string at `index`.
    fn get_str(&self, index: usize) -> Result<&str>;
    /// Order-preserving insert of an owned copy of `s` at `index`.
    fn insert_str(&mut self, index: usize, s: &str) -> Result<()>;
    /// Stores an owned copy of `s` at `index`. Returns the replaced string.
    fn set_str(&mut self, index: usize, s: &str) -> Result<String>;
}

fn owned<C>(container: &C, s: &str) -> Result<String>
where
    C: AnyContainer<TypedSlots<String>> + ?Sized,
{
    let mut out = String::new();
    out.try_reserve_exact(s.len()).map_err(|_| {
        container
            .config()
            .raise(Error::OutOfMemory { bytes: s.len() })
    })?;
    out.push_str(s);
    Ok(out)
}

impl<C> StrAccess for C
where
    C: AnyContainer<TypedSlots<String>> + ?Sized,
{
    fn push_str(&mut self, s: &str) -> Result<()> {
        let s = owned(self, s)?;
        self.push(s)
    }

    fn get_str(&self, index: usize) -> Result<&str> {
        self.get(index).map(String::as_str)
    }

    fn insert_str(&mut self, index: usize, s: &str) -> Result<()> {
        let s = owned(self, s)?;
        self.insert(index, s)
    }

    fn set_str(&mut self, index: usize, s: &str) -> Result<String> {
        let s = owned(self, s)?;
        self.set(index, s)
    }
}

// ─── Bits ─────────────────────────────────────────────────────────────────────

/// Boolean operations on bit-packed containers.
pub trait BitAccess {
    /// Pushes one bit.
    fn push_bit(&mut self, bit: bool) -> Result<()>;
    /// Pops the next bit.
    fn pop_bit(&mut self) -> Result<bool>;
    /// Reads the next bit without removing it.
    fn peek_bit(&self) -> Result<bool>;
    /// Reads the bit at `index`.
    fn get_bit(&self, index: usize) -> Result<bool>;
    /// Writes the bit at `index`. Returns the previous value.
    fn set_bit(&mut self, index: usize, bit: bool) -> Result<bool>;
}

impl<C> BitAccess for C
where
    C: AnyContainer<BitSlots> + ?Sized,
{
    #[inline]
    fn push_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit)
    }

    #[inline]
    fn pop_bit(&mut self) -> Result<bool> {
        self.pop()
    }

    #[inline]
    fn peek_bit(&self) -> Result<bool> {
        self.peek().map(|b| b[0])
    }

    #[inline]
    fn get_bit(&self, index: usize) -> Result<bool> {
        self.get(index).map(|b| b[0])
    }

    #[inline]
    fn set_bit(&mut self, index: usize, bit: bool) -> Result<bool> {
        self.set(index, bit)
    }
}
