//! Cursor-style reader over a byte slice.
//!
//! [`Parser`] keeps a position into borrowed data and offers bounds-checked sequential
//! reads, including the ECMA-335 compressed unsigned integer encoding used as the length
//! prefix of `#Blob` heap entries (II.23.2).

use crate::{
    file::io::{read_le_at, Primitive},
    Error::OutOfBounds,
    Result,
};

/// A sequential, bounds-checked reader over borrowed binary data.
///
/// # Examples
///
/// ```rust
/// use gacscope::Parser;
///
/// let mut parser = Parser::new(&[0x81, 0x02, 0xAA]);
/// assert_eq!(parser.read_compressed_uint()?, 0x102);
/// assert_eq!(parser.read_le::<u8>()?, 0xAA);
/// # Ok::<(), gacscope::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current position within the data.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes left after the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies past the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Skip `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the skip would leave the data.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let Some(target) = self.position.checked_add(step) else {
            return Err(OutOfBounds);
        };

        self.seek(target)
    }

    /// Read a little-endian value and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_le<T: Primitive>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }

    /// Read a 2- or 4-byte index and widen it to `u32`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_index(&mut self, is_large: bool) -> Result<u32> {
        if is_large {
            self.read_le::<u32>()
        } else {
            Ok(u32::from(self.read_le::<u16>()?))
        }
    }

    /// Read an ECMA-335 compressed unsigned integer (1, 2 or 4 bytes).
    ///
    /// # Errors
    /// Returns an error if the leading byte is not a valid encoding or data runs out.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(length) else {
            return Err(OutOfBounds);
        };

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_uint_encodings() {
        #[rustfmt::skip]
        let data = [
            0x03,                   // 1 byte
            0x80, 0x80,             // 2 bytes: 0x80
            0xBF, 0xFF,             // 2 bytes: 0x3FFF
            0xC0, 0x00, 0x40, 0x00, // 4 bytes: 0x4000
        ];

        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x03);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x80);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x3FFF);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x4000);
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn test_compressed_uint_invalid() {
        let mut parser = Parser::new(&[0xE0, 0x00, 0x00, 0x00]);
        assert!(parser.read_compressed_uint().is_err());

        let mut truncated = Parser::new(&[0x80]);
        assert!(truncated.read_compressed_uint().is_err());
    }

    #[test]
    fn test_seek_and_read_bytes() {
        let data = [0x10, 0x20, 0x30, 0x40];
        let mut parser = Parser::new(&data);

        parser.seek(1).unwrap();
        assert_eq!(parser.read_bytes(2).unwrap(), &[0x20, 0x30]);
        assert_eq!(parser.pos(), 3);
        assert!(parser.read_bytes(2).is_err());
        assert!(parser.seek(5).is_err());
        assert!(parser.advance_by(usize::MAX).is_err());
    }

    #[test]
    fn test_read_index() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_index(false).unwrap(), 1);
        assert_eq!(parser.read_index(true).unwrap(), 2);
        assert!(parser.read_index(false).is_err());
    }
}
