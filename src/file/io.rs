//! Bounds-checked little-endian reads for PE and CLI metadata parsing.
//!
//! Every multi-byte value in a PE image and in ECMA-335 metadata is stored little-endian.
//! The helpers here read primitive values out of byte slices without ever panicking on
//! short input: a read past the end of the slice yields [`crate::Error::OutOfBounds`].
//!
//! # Key Components
//!
//! - [`Primitive`] - Implemented for the unsigned integer widths metadata uses
//! - [`read_le`] - Read a value from the start of a buffer
//! - [`read_le_at`] - Read a value at an offset and advance the offset
//!
//! # Examples
//!
//! ```rust,ignore
//! use gacscope::file::io::read_le_at;
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let first: u16 = read_le_at(&data, &mut offset)?;
//! let second: u16 = read_le_at(&data, &mut offset)?;
//! let third: u32 = read_le_at(&data, &mut offset)?;
//!
//! assert_eq!((first, second, third), (1, 2, 3));
//! assert_eq!(offset, 8);
//! # Ok::<(), gacscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// A fixed-width integer that can be decoded from little-endian bytes.
pub trait Primitive: Sized {
    /// Byte array type holding the encoded value.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode the value from little-endian bytes.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_primitive!(u8, u16, u32, u64);

/// Reads a value of type `T` in little-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: Primitive>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` in little-endian byte order at `offset`, advancing `offset`
/// by the size of `T` on success.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: Primitive>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}
